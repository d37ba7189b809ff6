//! # Config 模块
//!
//! 所有可调参数的单一来源：窗口、幻灯片、文本、音频与粒子的设置
//! 都从 `config.json` 读入，缺失的字段逐项落到默认值。
//! 命令行参数可以覆盖个别条目（见 `main`）。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::texts::{GeneratorKind, TextEntry};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 资源根目录
    #[serde(default = "default_assets_root")]
    pub assets_root: PathBuf,

    /// 字体路径（相对于 assets_root），需要带中文字形
    #[serde(default = "default_font_path")]
    pub default_font: String,

    /// 窗口配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 幻灯片配置
    #[serde(default)]
    pub slideshow: SlideshowConfig,

    /// 文本配置
    #[serde(default)]
    pub text: TextConfig,

    /// 音频配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 粒子配置
    #[serde(default)]
    pub particles: ParticleConfig,

    /// 调试配置
    #[serde(default)]
    pub debug: DebugConfig,
}

/// 窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 窗口宽度
    #[serde(default = "default_window_width")]
    pub width: u32,

    /// 窗口高度
    #[serde(default = "default_window_height")]
    pub height: u32,

    /// 窗口标题
    #[serde(default = "default_window_title")]
    pub title: String,

    /// 是否全屏
    #[serde(default)]
    pub fullscreen: bool,

    /// 是否按显示器像素密度渲染
    #[serde(default = "default_high_dpi")]
    pub high_dpi: bool,
}

/// 幻灯片配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideshowConfig {
    /// 图片文件名前缀
    #[serde(default = "default_image_base_name")]
    pub image_base_name: String,

    /// 图片扩展名
    #[serde(default = "default_image_extension")]
    pub image_extension: String,

    /// 图片数量（文件名编号 1..=count）
    #[serde(default = "default_image_count")]
    pub image_count: u32,

    /// 图片轮换间隔（秒）
    #[serde(default = "default_image_interval")]
    pub image_interval: f32,

    /// 交叉淡入淡出总时长（秒）
    #[serde(default = "default_fade_duration")]
    pub fade_duration: f32,
}

/// 文本配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    /// 文本条目（字面文本或生成器）
    #[serde(default = "default_text_entries")]
    pub entries: Vec<TextEntry>,

    /// 文本轮换间隔（秒）
    #[serde(default = "default_text_interval")]
    pub interval: f32,

    /// 打字速度区间（每字符延迟，毫秒）
    #[serde(default = "default_typing_speed")]
    pub typing_speed: SpeedRange,

    /// 生成器失败时的替代文本
    #[serde(default = "default_text_fallback")]
    pub fallback: String,
}

/// 数值区间 [min, max]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpeedRange {
    pub min: f32,
    pub max: f32,
}

/// 音频配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// 首选音频文件（无损，相对于 assets_root）
    #[serde(default = "default_audio_file")]
    pub file: String,

    /// 回退音频文件（有损）
    #[serde(default = "default_audio_fallback")]
    pub fallback_file: String,

    /// 音量 (0.0 - 1.0)
    #[serde(default = "default_audio_volume")]
    pub volume: f32,

    /// 是否静音
    #[serde(default)]
    pub muted: bool,
}

/// 粒子配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// 单次点击生成的雨滴数量
    #[serde(default = "default_raindrop_count")]
    pub raindrop_count: u32,

    /// 雪花数量上限（实际目标还受视口宽度限制）
    #[serde(default = "default_snowflake_count")]
    pub snowflake_count: u32,

    /// 雨滴速度区间（像素 / 基准帧）
    #[serde(default = "default_raindrop_speed")]
    pub raindrop_speed: SpeedRange,

    /// 雪花下落速度区间（像素 / 基准帧）
    #[serde(default = "default_snowflake_speed")]
    pub snowflake_speed: SpeedRange,

    /// 雨滴颜色（十六进制，如 "#818cf8"）
    #[serde(default = "default_raindrop_color")]
    pub raindrop_color: String,

    /// 雪花颜色
    #[serde(default = "default_snowflake_color")]
    pub snowflake_color: String,
}

/// 调试配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// 启动时是否直接进入调试模式（F1 可随时切换）
    #[serde(default)]
    pub debug_mode: bool,
}

// 默认值函数

fn default_assets_root() -> PathBuf {
    PathBuf::from("assets")
}

fn default_font_path() -> String {
    "fonts/simhei.ttf".to_string()
}

fn default_window_width() -> u32 {
    1280
}

fn default_window_height() -> u32 {
    720
}

fn default_window_title() -> String {
    "Ambience".to_string()
}

fn default_high_dpi() -> bool {
    true
}

fn default_image_base_name() -> String {
    "Pic".to_string()
}

fn default_image_extension() -> String {
    ".png".to_string()
}

fn default_image_count() -> u32 {
    4
}

fn default_image_interval() -> f32 {
    2.0
}

fn default_fade_duration() -> f32 {
    1.0
}

fn default_text_entries() -> Vec<TextEntry> {
    vec![
        TextEntry::Literal("Life is relaxing.".to_string()),
        TextEntry::Literal("静谧与宁静".to_string()),
        TextEntry::Literal("月亮与太阳".to_string()),
        TextEntry::Literal("简洁还是不一般？".to_string()),
        TextEntry::Generated {
            generator: GeneratorKind::DaysToLunarNewYear,
        },
        TextEntry::Generated {
            generator: GeneratorKind::DaysToNewYear,
        },
    ]
}

fn default_text_interval() -> f32 {
    5.0
}

fn default_typing_speed() -> SpeedRange {
    SpeedRange {
        min: 50.0,
        max: 100.0,
    }
}

fn default_text_fallback() -> String {
    "……".to_string()
}

fn default_audio_file() -> String {
    "Run.flac".to_string()
}

fn default_audio_fallback() -> String {
    "Run.mp3".to_string()
}

fn default_audio_volume() -> f32 {
    0.7
}

fn default_raindrop_count() -> u32 {
    15
}

fn default_snowflake_count() -> u32 {
    30
}

fn default_raindrop_speed() -> SpeedRange {
    SpeedRange {
        min: 8.0,
        max: 15.0,
    }
}

fn default_snowflake_speed() -> SpeedRange {
    SpeedRange { min: 1.0, max: 3.0 }
}

fn default_raindrop_color() -> String {
    "#818cf8".to_string()
}

fn default_snowflake_color() -> String {
    "#ffffff".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_root: default_assets_root(),
            default_font: default_font_path(),
            window: WindowConfig::default(),
            slideshow: SlideshowConfig::default(),
            text: TextConfig::default(),
            audio: AudioConfig::default(),
            particles: ParticleConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
            title: default_window_title(),
            fullscreen: false,
            high_dpi: default_high_dpi(),
        }
    }
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            image_base_name: default_image_base_name(),
            image_extension: default_image_extension(),
            image_count: default_image_count(),
            image_interval: default_image_interval(),
            fade_duration: default_fade_duration(),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            entries: default_text_entries(),
            interval: default_text_interval(),
            typing_speed: default_typing_speed(),
            fallback: default_text_fallback(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            file: default_audio_file(),
            fallback_file: default_audio_fallback(),
            volume: default_audio_volume(),
            muted: false,
        }
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            raindrop_count: default_raindrop_count(),
            snowflake_count: default_snowflake_count(),
            raindrop_speed: default_raindrop_speed(),
            snowflake_speed: default_snowflake_speed(),
            raindrop_color: default_raindrop_color(),
            snowflake_color: default_snowflake_color(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self { debug_mode: false }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 文件缺失或内容损坏都不算错误：记一条警告，整体退回默认配置。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slideshow.image_count == 0 {
            return Err(ConfigError::ValidationFailed(
                "图片数量必须至少为 1".to_string(),
            ));
        }

        if self.slideshow.image_interval <= 0.0 || self.text.interval <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "轮换间隔必须大于 0".to_string(),
            ));
        }

        if self.slideshow.fade_duration <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "淡入淡出时长必须大于 0".to_string(),
            ));
        }

        if self.audio.volume < 0.0 || self.audio.volume > 1.0 {
            return Err(ConfigError::ValidationFailed(
                "音量必须在 0.0 - 1.0 之间".to_string(),
            ));
        }

        if self.text.typing_speed.min < 0.0 || self.text.typing_speed.min > self.text.typing_speed.max
        {
            return Err(ConfigError::ValidationFailed(
                "打字速度区间无效（需要 0 <= min <= max）".to_string(),
            ));
        }

        if self.particles.raindrop_speed.min > self.particles.raindrop_speed.max
            || self.particles.snowflake_speed.min > self.particles.snowflake_speed.max
        {
            return Err(ConfigError::ValidationFailed(
                "粒子速度区间无效（需要 min <= max）".to_string(),
            ));
        }

        Ok(())
    }

    /// 获取第 index 张图片的完整路径（编号从 1 开始）
    pub fn image_full_path(&self, index: u32) -> PathBuf {
        self.assets_root.join(format!(
            "{}{}{}",
            self.slideshow.image_base_name, index, self.slideshow.image_extension
        ))
    }

    /// 获取首选音频的完整路径
    pub fn audio_full_path(&self) -> PathBuf {
        self.assets_root.join(&self.audio.file)
    }

    /// 获取回退音频的完整路径
    pub fn audio_fallback_full_path(&self) -> PathBuf {
        self.assets_root.join(&self.audio.fallback_file)
    }

    /// 获取字体的完整路径
    pub fn font_full_path(&self) -> PathBuf {
        self.assets_root.join(&self.default_font)
    }
}

/// 配置错误
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// 序列化失败
    SerializationFailed(String),
    /// IO 错误
    IoError(String),
    /// 验证失败
    ValidationFailed(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::SerializationFailed(e) => write!(f, "配置序列化失败: {}", e),
            ConfigError::IoError(e) => write!(f, "配置 IO 错误: {}", e),
            ConfigError::ValidationFailed(e) => write!(f, "配置验证失败: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.slideshow.image_count, 4);
        assert_eq!(config.slideshow.image_base_name, "Pic");
        assert!((config.audio.volume - 0.7).abs() < f32::EPSILON);
        assert!(!config.text.entries.is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();

        // 反序列化
        let loaded: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.slideshow.image_count, config.slideshow.image_count);
        assert_eq!(loaded.text.entries.len(), config.text.entries.len());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        // 无效音量
        config.audio.volume = 2.0;
        assert!(config.validate().is_err());
        config.audio.volume = 0.7;

        // 图片数量为 0
        config.slideshow.image_count = 0;
        assert!(config.validate().is_err());
        config.slideshow.image_count = 4;

        // 打字速度区间颠倒
        config.text.typing_speed = SpeedRange {
            min: 100.0,
            max: 50.0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = AppConfig::load("no_such_config.json");
        assert_eq!(config.slideshow.image_count, 4);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.slideshow.image_count = 7;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path);
        assert_eq!(loaded.slideshow.image_count, 7);
    }

    #[test]
    fn test_image_full_path() {
        let config = AppConfig::default();
        let path = config.image_full_path(3);
        assert_eq!(path, PathBuf::from("assets/Pic3.png"));
    }
}
