use serde::de::DeserializeOwned;

/// Deserialize JSON with field-path context in error messages.
pub fn from_json_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        format!("at JSON path {path} → {}", err.into_inner())
    })
}

/// Deserialize TOML with field-path context in error messages.
pub fn from_toml_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = toml::Deserializer::new(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        format!("at TOML key {path} → {}", err.into_inner().message())
    })
}
