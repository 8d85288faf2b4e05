use crate::config;

/// Load settings, falling back to defaults when the file is unreadable or invalid.
///
/// The log file comes from the settings, so problems here go to stderr before
/// the terminal switches to the alternate screen.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(e) = s.validate() {
                eprintln!("voclip: invalid config, using defaults: {e}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("voclip: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
