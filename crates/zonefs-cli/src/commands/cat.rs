use zonefs_remote::Session;

pub async fn run(session: &Session, paths: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    // Raw bytes, no decoding: whatever the object holds goes to the terminal as-is
    let mut stdout = tokio::io::stdout();
    session.display_contents(paths, &mut stdout).await?;

    Ok(())
}
