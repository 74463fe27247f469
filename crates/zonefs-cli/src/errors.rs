use std::error::Error;

use zonefs_core::CatError;

/// Print an error and its cause chain to stderr.
pub fn print_error(err: &(dyn Error + 'static)) {
    eprintln!("Error: {}", err);

    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }

    if let Some(hint) = hint_for(err) {
        eprintln!("hint: {}", hint);
    }
}

fn hint_for(err: &(dyn Error + 'static)) -> Option<&'static str> {
    match err.downcast_ref::<CatError>()? {
        CatError::InvalidArguments => {
            Some("pass at least one data object path, e.g. `zonefs cat ~/notes.txt`")
        }
        CatError::NotFound(_) => {
            Some("relative paths resolve against session.cwd; `zonefs config` shows the effective value")
        }
        _ => None,
    }
}

