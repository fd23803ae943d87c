//! Process exit codes

use crate::api::error::ApiError;
use crate::config::ConfigError;
use crate::query::{FilterJsonError, FilterSyntaxError};
use crate::values::ValueError;

pub const GENERAL: u8 = 1;
pub const AUTH: u8 = 2;
pub const NOT_FOUND: u8 = 3;
pub const VALIDATION: u8 = 4;
pub const RATE_LIMITED: u8 = 5;

/// Map an error (anywhere in its chain) to an exit code
pub fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(api) = cause.downcast_ref::<ApiError>() {
            return match api.status_code() {
                401 | 403 => AUTH,
                404 => NOT_FOUND,
                400 | 422 => VALIDATION,
                429 => RATE_LIMITED,
                _ => GENERAL,
            };
        }
        if cause.is::<ConfigError>() {
            return AUTH;
        }
        if cause.is::<FilterSyntaxError>()
            || cause.is::<FilterJsonError>()
            || cause.is::<ValueError>()
        {
            return VALIDATION;
        }
    }
    GENERAL
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn maps_typed_errors() {
        let not_found: anyhow::Error = ApiError::from_response(404, "{}").into();
        assert_eq!(exit_code(&not_found), NOT_FOUND);

        let invalid: anyhow::Error = ApiError::from_response(400, "{}").into();
        assert_eq!(exit_code(&invalid), VALIDATION);

        let auth: anyhow::Error = ApiError::from_response(401, "{}").into();
        assert_eq!(exit_code(&auth), AUTH);

        let limited: anyhow::Error = ApiError::RateLimited { attempts: 3 }.into();
        assert_eq!(exit_code(&limited), RATE_LIMITED);

        let missing: anyhow::Error = ConfigError::MissingApiKey.into();
        assert_eq!(exit_code(&missing), AUTH);

        let values: anyhow::Error = ValueError::NoValues.into();
        assert_eq!(exit_code(&values), VALIDATION);

        let filter: anyhow::Error = FilterSyntaxError {
            expr: "x".to_string(),
        }
        .into();
        assert_eq!(exit_code(&filter), VALIDATION);

        let filter_json: anyhow::Error = crate::query::build_filter(&[], Some("{oops"))
            .unwrap_err();
        assert_eq!(exit_code(&filter_json), VALIDATION);
    }

    #[test]
    fn looks_through_context() {
        let err = Err::<(), _>(ValueError::NoValues)
            .context("creating record")
            .unwrap_err();
        assert_eq!(exit_code(&err), VALIDATION);
    }

    #[test]
    fn anything_else_is_general() {
        assert_eq!(exit_code(&anyhow::anyhow!("boom")), GENERAL);
    }
}
