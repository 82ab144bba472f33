use once_cell::sync::Lazy;
use regex::Regex;

static VERSION_STRING: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"CHROMEOS_VERSION_STRING=([0-9_.]+)").expect("version pattern is valid")
});

/// Value of the first `CHROMEOS_VERSION_STRING=` token in `text`.
///
/// Only digits, dots and underscores count as a version; anything else,
/// including empty or absent input, yields `None`.
pub fn get_chromeos_version(text: Option<&str>) -> Option<String> {
  let version = text
    .and_then(|text| VERSION_STRING.captures(text))
    .and_then(|captures| captures.get(1))
    .map(|found| found.as_str().to_string());

  match &version {
    Some(version) => log::info!("CHROMEOS_VERSION_STRING = {version}"),
    None => log::info!("CHROMEOS_VERSION_STRING NOT found"),
  }
  version
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_valid_version_returns_value() {
    assert_eq!(
      get_chromeos_version(Some(" CHROMEOS_VERSION_STRING=0.8.71.2010_09_10_1530 ")),
      Some("0.8.71.2010_09_10_1530".to_string())
    );
  }

  #[test]
  fn test_multiple_versions_return_first_match() {
    assert_eq!(
      get_chromeos_version(Some(
        " CHROMEOS_VERSION_STRING=0.8.71.2010_09_10_1530  CHROMEOS_VERSION_STRING=10_1530 "
      )),
      Some("0.8.71.2010_09_10_1530".to_string())
    );
    assert_eq!(
      get_chromeos_version(Some(
        "CHROMEOS_VERSION_STRING=1.2.3 CHROMEOS_VERSION_STRING=9.9.9"
      )),
      Some("1.2.3".to_string())
    );
  }

  #[test]
  fn test_version_inside_build_log() {
    let log = "export BOARD=x86-generic\nCHROMEOS_VERSION_STRING=0.9.80.2010_11_02_1234\nfoo=bar\n";

    assert_eq!(
      get_chromeos_version(Some(log)),
      Some("0.9.80.2010_11_02_1234".to_string())
    );
  }

  #[test]
  fn test_invalid_version_returns_none() {
    assert_eq!(
      get_chromeos_version(Some(" CHROMEOS_VERSION_STRING=invalid_version_string ")),
      None
    );
  }

  #[test]
  fn test_no_token_returns_none() {
    assert_eq!(get_chromeos_version(Some("VERSION=1.2.3")), None);
  }

  #[test]
  fn test_empty_input_returns_none() {
    assert_eq!(get_chromeos_version(Some("")), None);
  }

  #[test]
  fn test_absent_input_returns_none() {
    assert_eq!(get_chromeos_version(None), None);
  }
}
