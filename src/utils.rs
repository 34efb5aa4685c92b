use std::path::PathBuf;

const CONFIG_DIR_NAME: &str = "cronoweath";
const CONFIG_FILE_NAME: &str = "config.json";

pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
}

pub fn get_config_file() -> Option<PathBuf> {
    get_config_dir().map(|p| p.join(CONFIG_FILE_NAME))
}

/// Base URL without trailing slashes, so that paths can be appended with `format!`.
pub fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_base_url() {
        assert_eq!(trim_base_url("http://localhost:8000//"), "http://localhost:8000");
        assert_eq!(trim_base_url(" https://api.example.org "), "https://api.example.org");
    }
}
