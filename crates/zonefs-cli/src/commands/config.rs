use zonefs_remote::Session;

pub async fn run(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", session.config().to_yaml()?);
    Ok(())
}
