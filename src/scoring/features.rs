//! Login feature schema and vector assembly
//!
//! The schema is recorded at training time and travels with the anomaly model.
//! Inference reads attributes in schema order; anything the record does not carry
//! is filled with zero.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::{Result, ScoringError};

/// Dense feature vector
pub type FeatureVector = Vec<f64>;

/// Known login attributes, in default schema order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginFeature {
    LoginHour,
    IpFrequency,
    DeviceChange,
    FailedAttempts,
    SessionDuration,
}

impl LoginFeature {
    pub const ALL: [LoginFeature; 5] = [
        LoginFeature::LoginHour,
        LoginFeature::IpFrequency,
        LoginFeature::DeviceChange,
        LoginFeature::FailedAttempts,
        LoginFeature::SessionDuration,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LoginFeature::LoginHour => "login_hour",
            LoginFeature::IpFrequency => "ip_frequency",
            LoginFeature::DeviceChange => "device_change",
            LoginFeature::FailedAttempts => "failed_attempts",
            LoginFeature::SessionDuration => "session_duration",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl fmt::Display for LoginFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered feature names defining the tabular vector layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Schema from explicit names. Names must be non-empty and unique.
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(ScoringError::FeatureSchemaMismatch("schema has no features".to_string()));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(ScoringError::FeatureSchemaMismatch(format!(
                    "duplicate feature name: {}",
                    name
                )));
            }
        }
        Ok(Self { names })
    }

    /// The login schema used by training
    pub fn login() -> Self {
        Self {
            names: LoginFeature::ALL.iter().map(|f| f.name().to_string()).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// A single login event
///
/// Every attribute is optional so partial records still score; `build_vector`
/// fills gaps with zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_hour: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_change: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_attempts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_duration: Option<f64>,
}

impl LoginEvent {
    /// Fully populated event
    pub fn new(
        login_hour: f64,
        ip_frequency: f64,
        device_change: f64,
        failed_attempts: f64,
        session_duration: f64,
    ) -> Self {
        Self {
            login_hour: Some(login_hour),
            ip_frequency: Some(ip_frequency),
            device_change: Some(device_change),
            failed_attempts: Some(failed_attempts),
            session_duration: Some(session_duration),
        }
    }

    pub fn get(&self, feature: LoginFeature) -> Option<f64> {
        match feature {
            LoginFeature::LoginHour => self.login_hour,
            LoginFeature::IpFrequency => self.ip_frequency,
            LoginFeature::DeviceChange => self.device_change,
            LoginFeature::FailedAttempts => self.failed_attempts,
            LoginFeature::SessionDuration => self.session_duration,
        }
    }

    /// Attribute by schema name; unknown names read as absent
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        LoginFeature::from_name(name).and_then(|f| self.get(f))
    }

    /// Range checks producers run before scoring. The vector builder itself never clamps.
    pub fn validate(&self) -> Result<()> {
        for feature in LoginFeature::ALL {
            if let Some(value) = self.get(feature) {
                if !value.is_finite() {
                    return Err(ScoringError::InvalidInput(format!("{} must be a finite number", feature)));
                }
                if value < 0.0 {
                    return Err(ScoringError::InvalidInput(format!("{} must be non-negative", feature)));
                }
            }
        }
        if let Some(hour) = self.login_hour {
            if hour > 23.0 {
                return Err(ScoringError::InvalidInput("login_hour must be within 0-23".to_string()));
            }
        }
        if let Some(change) = self.device_change {
            if change != 0.0 && change != 1.0 {
                return Err(ScoringError::InvalidInput("device_change must be 0 or 1".to_string()));
            }
        }
        Ok(())
    }

    /// Vector in schema order, missing attributes default to 0
    pub fn build_vector(&self, schema: &FeatureSchema) -> FeatureVector {
        schema
            .names()
            .iter()
            .map(|name| self.get_by_name(name).unwrap_or(0.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_schema_order() {
        let schema = FeatureSchema::login();
        assert_eq!(
            schema.names(),
            &["login_hour", "ip_frequency", "device_change", "failed_attempts", "session_duration"]
        );
    }

    #[test]
    fn test_build_vector_follows_schema() {
        let event = LoginEvent::new(3.0, 2.0, 1.0, 7.0, 2.0);
        let vector = event.build_vector(&FeatureSchema::login());
        assert_eq!(vector, vec![3.0, 2.0, 1.0, 7.0, 2.0]);

        let reordered = FeatureSchema::new(vec![
            "session_duration".to_string(),
            "login_hour".to_string(),
        ])
        .unwrap();
        assert_eq!(event.build_vector(&reordered), vec![2.0, 3.0]);
    }

    #[test]
    fn test_missing_feature_defaults_to_zero() {
        let event = LoginEvent {
            session_duration: None,
            ..LoginEvent::new(10.0, 55.0, 0.0, 0.0, 30.0)
        };
        let vector = event.build_vector(&FeatureSchema::login());
        assert_eq!(vector[4], 0.0);
    }

    #[test]
    fn test_unknown_schema_name_reads_zero() {
        let schema = FeatureSchema::new(vec!["login_hour".to_string(), "geo_distance".to_string()]).unwrap();
        let vector = LoginEvent::new(4.0, 1.0, 0.0, 0.0, 1.0).build_vector(&schema);
        assert_eq!(vector, vec![4.0, 0.0]);
    }

    #[test]
    fn test_out_of_range_is_not_clamped() {
        let event = LoginEvent::new(40.0, 1.0, 0.0, 0.0, 1.0);
        assert!(event.validate().is_err());
        assert_eq!(event.build_vector(&FeatureSchema::login())[0], 40.0);
    }

    #[test]
    fn test_validate() {
        assert!(LoginEvent::new(23.0, 0.0, 1.0, 0.0, 0.0).validate().is_ok());
        assert!(LoginEvent::new(5.0, 1.0, 0.5, 0.0, 0.0).validate().is_err());
        assert!(LoginEvent::new(5.0, -1.0, 0.0, 0.0, 0.0).validate().is_err());
        assert!(LoginEvent::default().validate().is_ok());
    }

    #[test]
    fn test_schema_rejects_duplicates() {
        let err = FeatureSchema::new(vec!["a".to_string(), "a".to_string()]).unwrap_err();
        assert!(matches!(err, ScoringError::FeatureSchemaMismatch(_)));
        assert!(FeatureSchema::new(vec![]).is_err());
    }
}
