use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "AudioConfig::default_latency_ms")]
    pub latency_ms: f32,
    #[serde(default = "AudioConfig::default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default)]
    pub output_guard: OutputGuardSetting,
}

impl AudioConfig {
    fn default_latency_ms() -> f32 {
        50.0
    }
    fn default_sample_rate() -> u32 {
        48_000
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            latency_ms: Self::default_latency_ms(),
            sample_rate: Self::default_sample_rate(),
            output_guard: OutputGuardSetting::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputGuardSetting {
    None,
    SoftClip,
}

impl Default for OutputGuardSetting {
    fn default() -> Self {
        Self::SoftClip
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "SceneConfig::default_flow_particles")]
    pub flow_particles: usize,
    #[serde(default = "SceneConfig::default_max_vines")]
    pub max_vines: usize,
    #[serde(default = "SceneConfig::default_vine_spawn_period")]
    pub vine_spawn_period: u64,
    #[serde(default = "SceneConfig::default_mosaic_cell_px")]
    pub mosaic_cell_px: f32,
}

impl SceneConfig {
    fn default_flow_particles() -> usize {
        120
    }
    fn default_max_vines() -> usize {
        150
    }
    fn default_vine_spawn_period() -> u64 {
        6
    }
    fn default_mosaic_cell_px() -> f32 {
        8.0
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            flow_particles: Self::default_flow_particles(),
            max_vines: Self::default_max_vines(),
            vine_spawn_period: Self::default_vine_spawn_period(),
            mosaic_cell_px: Self::default_mosaic_cell_px(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    #[serde(default = "TrackingConfig::default_video_width")]
    pub video_width: u32,
    #[serde(default = "TrackingConfig::default_video_height")]
    pub video_height: u32,
    #[serde(default = "TrackingConfig::default_fist_threshold_px")]
    pub fist_threshold_px: f32,
}

impl TrackingConfig {
    fn default_video_width() -> u32 {
        320
    }
    fn default_video_height() -> u32 {
        240
    }
    fn default_fist_threshold_px() -> f32 {
        35.0
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            video_width: Self::default_video_width(),
            video_height: Self::default_video_height(),
            fist_threshold_px: Self::default_fist_threshold_px(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
}

impl AppConfig {
    fn format_f32_compact(x: f32) -> String {
        let mut s = format!("{:.6}", x);
        while s.contains('.') && s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
        if s.is_empty() { "0".to_string() } else { s }
    }

    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        eprintln!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    eprintln!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        // File does not exist: write commented defaults and return them.
        let default_cfg = Self::default();
        if let Ok(text) = toml::to_string_pretty(&default_cfg) {
            let mut commented = String::new();
            for line in text.lines() {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    commented.push('\n');
                } else if trimmed.starts_with('[') && trimmed.ends_with(']') {
                    commented.push_str(line);
                    commented.push('\n');
                } else {
                    let mut out_line = line.to_string();
                    if let Some((lhs, rhs)) = line.split_once('=') {
                        let rhs_trim = rhs.trim();
                        let has_decimal = rhs_trim.contains('.');
                        if (has_decimal || rhs_trim.contains('e') || rhs_trim.contains('E'))
                            && !rhs_trim.contains('"')
                            && rhs_trim != "true"
                            && rhs_trim != "false"
                        {
                            if let Ok(val) = rhs_trim.parse::<f32>() {
                                let mut formatted = Self::format_f32_compact(val);
                                if has_decimal && !formatted.contains('.') {
                                    formatted.push_str(".0");
                                }
                                out_line = format!("{} = {}", lhs.trim(), formatted);
                            }
                        }
                    }
                    commented.push_str("# ");
                    commented.push_str(&out_line);
                    commented.push('\n');
                }
            }
            if let Err(err) = fs::write(path_obj, commented) {
                eprintln!("Failed to write default config to {path}: {err}");
            }
        } else {
            eprintln!("Failed to serialize default config; continuing with defaults");
        }
        default_cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn unique_path(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "medusae_config_test_{}_{}",
            name,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        p
    }

    #[test]
    fn load_or_default_writes_defaults_cleanly() {
        let path = unique_path("defaults.toml");
        let path_str = path.to_string_lossy().to_string();
        let _ = fs::remove_file(&path);

        let cfg = AppConfig::load_or_default(&path_str);
        assert!(path.exists(), "config file should be created");
        assert_eq!(cfg.audio.latency_ms, 50.0);
        assert_eq!(cfg.audio.sample_rate, 48_000);
        assert_eq!(cfg.audio.output_guard, OutputGuardSetting::SoftClip);
        assert_eq!(cfg.scene.flow_particles, 120);
        assert_eq!(cfg.scene.max_vines, 150);
        assert_eq!(cfg.tracking.video_width, 320);
        assert_eq!(cfg.tracking.fist_threshold_px, 35.0);

        let contents = fs::read_to_string(&path).expect("read written config");
        assert!(
            contents.contains("# flow_particles = 120"),
            "should write commented flow_particles"
        );
        assert!(
            contents.contains("# fist_threshold_px = 35.0"),
            "should write commented fist_threshold_px"
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_or_default_reads_existing() {
        let path = unique_path("custom.toml");
        let path_str = path.to_string_lossy().to_string();
        let custom = AppConfig {
            audio: AudioConfig {
                latency_ms: 75.0,
                sample_rate: 44_100,
                output_guard: OutputGuardSetting::None,
            },
            scene: SceneConfig {
                flow_particles: 40,
                max_vines: 20,
                vine_spawn_period: 12,
                mosaic_cell_px: 16.0,
            },
            tracking: TrackingConfig {
                video_width: 640,
                video_height: 480,
                fist_threshold_px: 50.0,
            },
        };
        let text = toml::to_string_pretty(&custom).unwrap();
        fs::write(&path, text).unwrap();

        let cfg = AppConfig::load_or_default(&path_str);
        assert_eq!(cfg.audio.latency_ms, 75.0);
        assert_eq!(cfg.audio.sample_rate, 44_100);
        assert_eq!(cfg.audio.output_guard, OutputGuardSetting::None);
        assert_eq!(cfg.scene.flow_particles, 40);
        assert_eq!(cfg.scene.max_vines, 20);
        assert_eq!(cfg.scene.vine_spawn_period, 12);
        assert_eq!(cfg.scene.mosaic_cell_px, 16.0);
        assert_eq!(cfg.tracking.video_width, 640);
        assert_eq!(cfg.tracking.fist_threshold_px, 50.0);

        let _ = fs::remove_file(&path);
    }
}
