//! Completion certificate

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::config::profile::UserProfile;
use crate::config::progress::ProgressSets;

/// What the certificate screen shows
#[derive(Debug, Clone, PartialEq)]
pub struct Certificate {
    pub name: String,
    pub track: String,
    pub batch_code: String,
    /// Date of the last completed day
    pub completed_on: NaiveDate,
    pub days_completed: usize,
}

impl Certificate {
    /// Build from the profile and progress; `None` until a day has been completed
    pub fn new(profile: &UserProfile, progress: &ProgressSets) -> Option<Self> {
        let completed_on = progress.last_completed()?;
        let mut days = progress.completed.clone();
        days.sort_unstable();
        days.dedup();

        Some(Self {
            name: profile.name.clone(),
            track: profile.track.display_name().to_string(),
            batch_code: profile.batch_code.clone(),
            completed_on,
            days_completed: days.len(),
        })
    }

    /// One-paragraph text for sharing
    pub fn share_text(&self) -> String {
        format!(
            "I just completed the Healthcare Analysis HQ challenge! {} days of healthcare data \
             queries as part of the {} track (batch {}), finished on {}.",
            self.days_completed,
            self.track,
            self.batch_code,
            self.completed_on.format("%B %-d, %Y"),
        )
    }

    /// Plain-text rendition for download
    pub fn render(&self) -> String {
        let rule = "=".repeat(60);
        let lines = vec![
            rule.clone(),
            String::new(),
            format!("{:^60}", "HEALTHCARE ANALYSIS HQ"),
            format!("{:^60}", "Certificate of Completion"),
            String::new(),
            "This certifies that".to_string(),
            String::new(),
            format!("    {}", self.name),
            String::new(),
            format!("completed {} days of the daily healthcare data challenge", self.days_completed),
            format!("Track: {}", self.track),
            format!("Batch: {}", self.batch_code),
            format!("Date:  {}", self.completed_on.format("%Y-%m-%d")),
            String::new(),
            rule,
        ];
        lines.join("\n") + "\n"
    }

    pub fn file_name(&self) -> String {
        let slug: String = self
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        format!("haq-certificate-{}.txt", slug.trim_matches('-'))
    }

    /// Write the certificate into `dir`, returning the file path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {:?}", dir))?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.render())
            .with_context(|| format!("Failed to write certificate to {:?}", path))?;
        tracing::info!("Certificate written to {:?}", path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::profile::Track;

    fn certificate() -> Certificate {
        let profile = UserProfile::new("Ada Lovelace", Track::Sdet, "SD-07");
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut progress = ProgressSets::default();
        for date in start.iter_days().take(15) {
            progress.record_completion(date);
        }
        Certificate::new(&profile, &progress).unwrap()
    }

    #[test]
    fn certificate_needs_a_completion() {
        let profile = UserProfile::new("Ada", Track::Da, "DA-01");
        assert!(Certificate::new(&profile, &ProgressSets::default()).is_none());
    }

    #[test]
    fn certificate_uses_last_completion() {
        let cert = certificate();
        assert_eq!(cert.completed_on, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(cert.days_completed, 15);
        assert!(cert.share_text().contains("January 15, 2025"));
        assert!(cert.render().contains("Ada Lovelace"));
        assert_eq!(cert.file_name(), "haq-certificate-ada-lovelace.txt");
    }

    #[test]
    fn write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = certificate().write_to(dir.path()).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("Certificate of Completion"));
    }
}
