//! Allowed HTTP verbs

use crate::error::HttpError;
use std::fmt;
use std::str::FromStr;

/// HTTP methods accepted by the request builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Every allowed verb, in allow-list order.
    pub const ALL: [HttpMethod; 4] = [Self::Post, Self::Get, Self::Put, Self::Delete];

    /// Returns the method as an uppercase string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = HttpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "delete" => Ok(Self::Delete),
            _ => Err(HttpError::config(format!("method {} not allowed", s))),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_str_any_case() {
        assert_eq!(HttpMethod::from_str("GET").unwrap(), HttpMethod::Get);
        assert_eq!(HttpMethod::from_str("get").unwrap(), HttpMethod::Get);
        assert_eq!(HttpMethod::from_str("pOsT").unwrap(), HttpMethod::Post);
        assert_eq!(HttpMethod::from_str("Delete").unwrap(), HttpMethod::Delete);
    }

    #[test]
    fn test_method_outside_allow_list() {
        for verb in ["PATCH", "HEAD", "OPTIONS", "TRACE", ""] {
            let err = HttpMethod::from_str(verb).unwrap_err();
            assert!(matches!(err, HttpError::InvalidConfig(_)), "{verb} accepted");
        }
    }

    #[test]
    fn test_reqwest_method_conversion() {
        for method in HttpMethod::ALL {
            assert_eq!(reqwest::Method::from(method).as_str(), method.as_str());
        }
    }
}
