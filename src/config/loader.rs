//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configurations from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::error::{PayrollError, PayrollResult};

use super::types::{PayrollConfig, ScheduleMetadata, StatutorySchedule, WorkPolicy};

/// Loads and provides access to payroll configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to query the work policy and the statutory
/// schedule in effect on a date.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/ph_2023/
/// ├── schedule.yaml        # Schedule metadata
/// ├── work_policy.yaml     # Scheduled hours, grace cutoff, overtime rules
/// └── statutory/
///     └── 2023-01-01.yaml  # Statutory schedule effective from this date
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/ph_2023").unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// let schedule = loader.schedule_for(date).unwrap();
/// println!("Schedule effective from {}", schedule.effective_date);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML or an invalid table (`ConfigParseError`)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/ph_2023")?;
    /// # Ok::<(), payroll_engine::error::PayrollError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<ScheduleMetadata>(&path.join("schedule.yaml"))?;

        let policy_path = path.join("work_policy.yaml");
        let work_policy = Self::load_yaml::<WorkPolicy>(&policy_path)?;
        work_policy
            .validate()
            .map_err(|message| PayrollError::ConfigParseError {
                path: policy_path.display().to_string(),
                message,
            })?;

        let schedules = Self::load_schedules(&path.join("statutory"))?;

        tracing::debug!(
            code = %metadata.code,
            version = %metadata.version,
            schedules = schedules.len(),
            "loaded payroll configuration"
        );

        Ok(Self {
            config: PayrollConfig::new(metadata, work_policy, schedules),
        })
    }

    /// Builds the canonical configuration without touching the filesystem.
    pub fn canonical() -> Self {
        Self {
            config: PayrollConfig::canonical(),
        }
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: PayrollConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> PayrollResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PayrollError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all schedule files from the statutory directory.
    fn load_schedules(dir: &Path) -> PayrollResult<Vec<StatutorySchedule>> {
        let dir_str = dir.display().to_string();

        if !dir.exists() {
            return Err(PayrollError::ConfigNotFound { path: dir_str });
        }

        let entries = fs::read_dir(dir).map_err(|_| PayrollError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut schedules: Vec<StatutorySchedule> = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| PayrollError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let schedule = Self::load_yaml::<StatutorySchedule>(&path)?;
                let invalid = |message: String| PayrollError::ConfigParseError {
                    path: path.display().to_string(),
                    message,
                };
                schedule.validate().map_err(invalid)?;
                if schedules
                    .iter()
                    .any(|s| s.effective_date == schedule.effective_date)
                {
                    return Err(invalid(format!(
                        "duplicate schedule effective {}",
                        schedule.effective_date
                    )));
                }
                schedules.push(schedule);
            }
        }

        if schedules.is_empty() {
            return Err(PayrollError::ConfigNotFound {
                path: format!("{} (no schedule files found)", dir_str),
            });
        }

        Ok(schedules)
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the schedule metadata.
    pub fn metadata(&self) -> &ScheduleMetadata {
        self.config.metadata()
    }

    /// Returns the work policy.
    pub fn work_policy(&self) -> &WorkPolicy {
        self.config.work_policy()
    }

    /// Gets the statutory schedule in effect on a given date.
    ///
    /// The method finds the most recent schedule that is effective on or
    /// before the given date.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::ConfigLoader;
    /// use chrono::NaiveDate;
    ///
    /// let loader = ConfigLoader::canonical();
    /// let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    /// assert!(loader.schedule_for(date).is_ok());
    ///
    /// let before = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    /// assert!(loader.schedule_for(before).is_err());
    /// ```
    pub fn schedule_for(&self, date: NaiveDate) -> PayrollResult<&StatutorySchedule> {
        self.config
            .schedules()
            .iter()
            .rev()
            .find(|s| s.effective_date <= date)
            .ok_or(PayrollError::ScheduleNotFound { date })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/ph_2023"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.metadata().code, "PH_2023");
        assert_eq!(loader.metadata().version, "2023-01-01");
    }

    #[test]
    fn test_loaded_configuration_matches_canonical() {
        let loaded = ConfigLoader::load(config_path()).unwrap();
        let canonical = ConfigLoader::canonical();

        assert_eq!(loaded.work_policy(), canonical.work_policy());
        assert_eq!(loaded.config().schedules(), canonical.config().schedules());
    }

    #[test]
    fn test_schedule_for_returns_latest_effective() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let schedule = loader.schedule_for(make_date("2024-06-01")).unwrap();
        assert_eq!(schedule.effective_date, make_date("2023-01-01"));
        assert_eq!(schedule.housing_fund.cap, dec("100"));
    }

    #[test]
    fn test_schedule_for_picks_newest_of_several() {
        let mut later = StatutorySchedule::canonical();
        later.effective_date = make_date("2025-01-01");
        later.housing_fund.cap = dec("200");
        let loader = ConfigLoader::from_config(PayrollConfig::new(
            ConfigLoader::canonical().metadata().clone(),
            WorkPolicy::default(),
            vec![later, StatutorySchedule::canonical()],
        ));

        assert_eq!(
            loader.schedule_for(make_date("2024-12-31")).unwrap().housing_fund.cap,
            dec("100")
        );
        assert_eq!(
            loader.schedule_for(make_date("2025-01-01")).unwrap().housing_fund.cap,
            dec("200")
        );
    }

    #[test]
    fn test_schedule_not_found_before_first_effective_date() {
        let loader = ConfigLoader::canonical();
        let date = make_date("2022-12-31");

        match loader.schedule_for(date) {
            Err(PayrollError::ScheduleNotFound { date: d }) => assert_eq!(d, date),
            other => panic!("Expected ScheduleNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(PayrollError::ConfigNotFound { path }) => {
                assert!(path.contains("schedule.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }
}
