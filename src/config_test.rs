// Unit tests for configuration loading
//
// Tests that touch process environment variables run serially to avoid
// interfering with each other.

use super::*;
use serial_test::serial;

#[test]
fn test_parse_bool() {
    assert!(parse_bool("true"));
    assert!(parse_bool("TRUE"));
    assert!(parse_bool("1"));
    assert!(parse_bool("yes"));
    assert!(parse_bool(" true "));

    assert!(!parse_bool("false"));
    assert!(!parse_bool("0"));
    assert!(!parse_bool(""));
    assert!(!parse_bool("maybe"));
}

#[test]
fn test_slow_motion_follows_debug_mode() {
    let mut config = Config {
        credentials: Credentials {
            email: "user@example.com".to_string(),
            password: "hunter2".to_string(),
        },
        debug_mode: false,
        template: DEFAULT_TEMPLATE.to_string(),
    };
    assert_eq!(config.slow_motion(), Duration::ZERO);

    config.debug_mode = true;
    assert_eq!(config.slow_motion(), Duration::from_secs(1));
}

#[test]
#[serial]
fn test_missing_credentials_rejected() {
    env::remove_var(EMAIL_VAR);
    env::remove_var(PASSWORD_VAR);

    let err = Config::from_env().unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains(EMAIL_VAR));
}

#[test]
#[serial]
fn test_empty_credential_rejected() {
    env::set_var(EMAIL_VAR, "user@example.com");
    env::set_var(PASSWORD_VAR, "   ");

    let err = Config::from_env().unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains(PASSWORD_VAR));

    env::remove_var(EMAIL_VAR);
    env::remove_var(PASSWORD_VAR);
}

#[test]
#[serial]
fn test_defaults_and_overrides() {
    env::set_var(EMAIL_VAR, "user@example.com");
    env::set_var(PASSWORD_VAR, "hunter2");
    env::remove_var(DEBUG_VAR);
    env::remove_var(TEMPLATE_VAR);

    let config = Config::from_env().unwrap();
    assert_eq!(config.credentials.email, "user@example.com");
    assert!(!config.debug_mode);
    assert_eq!(config.template, DEFAULT_TEMPLATE);

    env::set_var(DEBUG_VAR, "true");
    env::set_var(TEMPLATE_VAR, "Hello [Name]!");
    let config = Config::from_env().unwrap();
    assert!(config.debug_mode);
    assert_eq!(config.template, "Hello [Name]!");

    env::remove_var(EMAIL_VAR);
    env::remove_var(PASSWORD_VAR);
    env::remove_var(DEBUG_VAR);
    env::remove_var(TEMPLATE_VAR);
}
