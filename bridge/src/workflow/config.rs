use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use trajcore::prelude::{PlaybackConfig, DEFAULT_CADENCE_MS};

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

fn default_cadence_ms() -> u64 {
    DEFAULT_CADENCE_MS
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    pub data: PathBuf,
    #[serde(default = "default_cadence_ms")]
    pub cadence_ms: u64,
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    #[serde(default)]
    pub readout_agent: Option<String>,
}

impl ReplayConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading replay config {}", path_ref.display()))?;
        let config: ReplayConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing replay config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        data: PathBuf,
        cadence_ms: u64,
        bind: Option<SocketAddr>,
        readout_agent: Option<String>,
    ) -> Self {
        Self {
            data,
            cadence_ms,
            bind: bind.unwrap_or_else(default_bind),
            readout_agent,
        }
    }

    pub fn to_playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            cadence_ms: self.cadence_ms,
            readout_agent: self.readout_agent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_playback_config() {
        let cfg = ReplayConfig::from_args("data.json".into(), 50, None, Some("Satellite".into()));
        let playback = cfg.to_playback_config();
        assert_eq!(playback.cadence_ms, 50);
        assert_eq!(playback.readout_agent.as_deref(), Some("Satellite"));
        assert_eq!(cfg.bind, default_bind());
    }

    #[test]
    fn config_load_reads_yaml_with_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"data: public/data.json\n").unwrap();
        let path = temp.into_temp_path();
        let cfg = ReplayConfig::load(&path).unwrap();
        assert_eq!(cfg.data, PathBuf::from("public/data.json"));
        assert_eq!(cfg.cadence_ms, DEFAULT_CADENCE_MS);
        assert_eq!(cfg.readout_agent, None);
    }

    #[test]
    fn config_load_reads_every_field() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"data: run.json\ncadence_ms: 20\nbind: 0.0.0.0:8080\nreadout_agent: Planet\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = ReplayConfig::load(&path).unwrap();
        assert_eq!(cfg.cadence_ms, 20);
        assert_eq!(cfg.bind, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(cfg.readout_agent.as_deref(), Some("Planet"));
    }

    #[test]
    fn config_load_reports_missing_data_path() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"cadence_ms: 20\n").unwrap();
        let path = temp.into_temp_path();
        assert!(ReplayConfig::load(&path).is_err());
    }
}
