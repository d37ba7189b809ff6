//! # Resources 模块
//!
//! 启动期资源加载：图片在工作线程中解码、音频做可解码性探测，全部并发
//! 进行，主循环逐帧收取完成事件并推进进度。
//!
//! ## 设计说明
//!
//! - 每个资源恰好产生一个完成事件（成功或失败），进度只增不减
//! - 成功图片按**完成顺序**记录，幻灯片按该顺序轮换，不保证编号顺序
//! - 单个资源失败只降级画面，不影响其余资源，也不阻塞启动
//! - 解码结果先以像素缓存，首次被渲染请求时才上传为 `Texture2D`

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use macroquad::prelude::*;
use tracing::{debug, info, warn};

use crate::config::AppConfig;

mod error;

pub use error::ResourceError;

/// 加载进度计数器
///
/// `loaded` 统计已结算的尝试次数（成功与失败都计入）。
#[derive(Debug, Clone)]
pub struct ProgressCounter {
    loaded: usize,
    total: usize,
}

impl ProgressCounter {
    /// 创建计数器，`total` 为预期尝试总数
    pub fn new(total: usize) -> Self {
        Self { loaded: 0, total }
    }

    /// 记录一次结算
    pub fn record(&mut self) {
        if self.loaded < self.total {
            self.loaded += 1;
        }
    }

    /// 已结算数量
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// 预期总数
    pub fn total(&self) -> usize {
        self.total
    }

    /// 进度百分比（向下取整）
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        (self.loaded * 100 / self.total) as u32
    }

    /// 是否全部结算
    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }
}

/// 已解码的图片像素（等待上传为纹理）
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// 资源路径（同时作为缓存键）
    pub path: String,
    /// 宽度（像素）
    pub width: u16,
    /// 高度（像素）
    pub height: u16,
    /// RGBA8 像素数据
    pub pixels: Vec<u8>,
}

/// 资源槽位（用于进度提示文案）
#[derive(Debug, Clone, Copy)]
enum AssetSlot {
    /// 第 index 张图片（共 count 张）
    Image { index: u32, count: u32 },
    /// 音频轨道
    Audio,
}

/// 单个资源的完成事件
struct LoadEvent {
    slot: AssetSlot,
    payload: LoadPayload,
}

/// 完成事件的载荷
enum LoadPayload {
    /// 图片解码成功
    Image(DecodedImage),
    /// 音频探测成功（原始字节，播放时再解码）
    Audio(Vec<u8>),
    /// 加载失败
    Failed(ResourceError),
}

/// 启动期资源加载器
///
/// `start` 为每张图片和音频各启动一个工作线程；`pump` 在主循环中逐帧
/// 收取完成事件。全部结算后用 `finish` 换取 [`AssetStore`]。
pub struct AssetLoader {
    rx: Receiver<LoadEvent>,
    progress: ProgressCounter,
    /// 成功图片路径，按完成顺序
    images: Vec<String>,
    /// 已解码、尚未上传的图片像素
    decoded: HashMap<String, DecodedImage>,
    /// 探测通过的音频字节
    audio: Option<Vec<u8>>,
    /// 最近一条进度提示
    status: String,
}

impl AssetLoader {
    /// 启动所有加载任务（每个资源一个线程，不做批次限流）
    pub fn start(config: &AppConfig) -> Self {
        let count = config.slideshow.image_count;
        let (tx, loader) = Self::with_channel(count as usize + 1);

        for index in 1..=count {
            let tx = tx.clone();
            let path = config.image_full_path(index);
            thread::spawn(move || {
                let payload = match decode_image(&path) {
                    Ok(image) => LoadPayload::Image(image),
                    Err(e) => LoadPayload::Failed(e),
                };
                // 接收端先行退出时丢弃事件即可
                let _ = tx.send(LoadEvent {
                    slot: AssetSlot::Image { index, count },
                    payload,
                });
            });
        }

        let primary = config.audio_full_path();
        let fallback = config.audio_fallback_full_path();
        thread::spawn(move || {
            let payload = match probe_audio(&primary) {
                Ok(bytes) => LoadPayload::Audio(bytes),
                Err(e) => {
                    debug!(error = %e, "首选音频不可用，尝试回退格式");
                    match probe_audio(&fallback) {
                        Ok(bytes) => LoadPayload::Audio(bytes),
                        Err(e) => LoadPayload::Failed(e),
                    }
                }
            };
            let _ = tx.send(LoadEvent {
                slot: AssetSlot::Audio,
                payload,
            });
        });

        info!(images = count, "资源加载已启动");
        loader
    }

    /// 创建仅带事件通道的加载器（加载任务由调用方驱动）
    fn with_channel(total: usize) -> (Sender<LoadEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        let loader = Self {
            rx,
            progress: ProgressCounter::new(total),
            images: Vec::new(),
            decoded: HashMap::new(),
            audio: None,
            status: String::new(),
        };
        (tx, loader)
    }

    /// 收取本帧到达的完成事件（每帧调用）
    pub fn pump(&mut self) {
        // 先收集再消化，避免借用冲突
        let events: Vec<LoadEvent> = self.rx.try_iter().collect();
        for event in events {
            self.absorb(event);
        }
    }

    /// 消化单个完成事件
    fn absorb(&mut self, event: LoadEvent) {
        match event.payload {
            LoadPayload::Image(image) => {
                if let AssetSlot::Image { index, count } = event.slot {
                    self.status = format!("图片 {}/{} 加载完成", index, count);
                }
                self.images.push(image.path.clone());
                self.decoded.insert(image.path.clone(), image);
            }
            LoadPayload::Audio(bytes) => {
                self.status = "音频加载完成".to_string();
                self.audio = Some(bytes);
            }
            LoadPayload::Failed(e) => {
                warn!(error = %e, "资源加载失败");
                self.status = match event.slot {
                    AssetSlot::Image { index, count } => {
                        format!("图片 {}/{} 加载失败", index, count)
                    }
                    AssetSlot::Audio => "音频加载失败".to_string(),
                };
            }
        }
        self.progress.record();
    }

    /// 进度计数器
    pub fn progress(&self) -> &ProgressCounter {
        &self.progress
    }

    /// 最近一条进度提示
    pub fn status(&self) -> &str {
        &self.status
    }

    /// 是否全部结算（全部失败也算完成）
    pub fn is_complete(&self) -> bool {
        self.progress.is_complete()
    }

    /// 结束加载，换取资源仓库
    pub fn finish(self) -> AssetStore {
        info!(
            images = self.images.len(),
            audio = self.audio.is_some(),
            "资源加载完成"
        );
        AssetStore {
            images: self.images,
            decoded: self.decoded,
            textures: HashMap::new(),
            audio: self.audio,
        }
    }
}

/// 资源仓库
///
/// 持有加载结果：完成顺序的图片列表、像素 / 纹理缓存、音频字节。
/// 纹理在首次请求时上传，之后命中缓存，避免重复上传。
pub struct AssetStore {
    images: Vec<String>,
    decoded: HashMap<String, DecodedImage>,
    textures: HashMap<String, Texture2D>,
    audio: Option<Vec<u8>>,
}

impl AssetStore {
    /// 成功加载的图片路径（完成顺序）
    pub fn image_paths(&self) -> &[String] {
        &self.images
    }

    /// 获取纹理（必要时先从像素上传）
    pub fn texture(&mut self, path: &str) -> Option<Texture2D> {
        if let Some(texture) = self.textures.get(path) {
            return Some(texture.clone());
        }

        let image = self.decoded.remove(path)?;
        let texture = Texture2D::from_rgba8(image.width, image.height, &image.pixels);
        texture.set_filter(FilterMode::Linear);
        self.textures.insert(path.to_string(), texture.clone());
        Some(texture)
    }

    /// 预热纹理（幻灯片切换前预取下一张，隐藏上传延迟）
    pub fn ensure_uploaded(&mut self, path: &str) {
        let _ = self.texture(path);
    }

    /// 取走音频字节（加载器到音频管理器的一次性交接）
    pub fn take_audio(&mut self) -> Option<Vec<u8>> {
        self.audio.take()
    }

    /// 已上传的纹理数量
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

/// 读取并解码图片为 RGBA8 像素
fn decode_image(path: &Path) -> Result<DecodedImage, ResourceError> {
    let key = path.to_string_lossy().to_string();

    let bytes = fs::read(path).map_err(|e| ResourceError::Read {
        path: key.clone(),
        message: e.to_string(),
    })?;

    let image = image::load_from_memory(&bytes).map_err(|e| ResourceError::Decode {
        path: key.clone(),
        kind: "图片".to_string(),
        message: e.to_string(),
    })?;

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width > u16::MAX as u32 || height > u16::MAX as u32 {
        return Err(ResourceError::Decode {
            path: key,
            kind: "图片".to_string(),
            message: format!("尺寸过大: {}x{}", width, height),
        });
    }

    Ok(DecodedImage {
        path: key,
        width: width as u16,
        height: height as u16,
        pixels: rgba.into_raw(),
    })
}

/// 读取音频文件并验证可解码（返回原始字节）
fn probe_audio(path: &Path) -> Result<Vec<u8>, ResourceError> {
    let key = path.to_string_lossy().to_string();

    let bytes = fs::read(path).map_err(|e| ResourceError::Read {
        path: key.clone(),
        message: e.to_string(),
    })?;

    rodio::Decoder::new(Cursor::new(bytes.clone())).map_err(|e| ResourceError::Decode {
        path: key,
        kind: "音频".to_string(),
        message: e.to_string(),
    })?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_event(index: u32, count: u32, path: &str) -> LoadEvent {
        LoadEvent {
            slot: AssetSlot::Image { index, count },
            payload: LoadPayload::Image(DecodedImage {
                path: path.to_string(),
                width: 2,
                height: 2,
                pixels: vec![255; 16],
            }),
        }
    }

    fn failed_event(index: u32, count: u32) -> LoadEvent {
        LoadEvent {
            slot: AssetSlot::Image { index, count },
            payload: LoadPayload::Failed(ResourceError::Read {
                path: format!("Pic{}.png", index),
                message: "No such file".to_string(),
            }),
        }
    }

    #[test]
    fn test_progress_percent() {
        let mut progress = ProgressCounter::new(3);
        assert_eq!(progress.percent(), 0);
        progress.record();
        assert_eq!(progress.percent(), 33);
        progress.record();
        assert_eq!(progress.percent(), 66);
        progress.record();
        assert_eq!(progress.percent(), 100);
        assert!(progress.is_complete());

        // 超额结算不会越界
        progress.record();
        assert_eq!(progress.loaded(), 3);
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn test_completion_order_not_index_order() {
        let (_tx, mut loader) = AssetLoader::with_channel(4);

        // 完成顺序：3, 1, 2（4 号失败）
        loader.absorb(image_event(3, 3, "Pic3.png"));
        loader.absorb(image_event(1, 3, "Pic1.png"));
        loader.absorb(image_event(2, 3, "Pic2.png"));
        loader.absorb(failed_event(4, 4));

        assert_eq!(loader.images, vec!["Pic3.png", "Pic1.png", "Pic2.png"]);
        assert_eq!(loader.progress().loaded(), 4);
        assert!(loader.is_complete());
    }

    #[test]
    fn test_mixed_failures_still_complete() {
        let (_tx, mut loader) = AssetLoader::with_channel(3);

        loader.absorb(failed_event(1, 2));
        loader.absorb(image_event(2, 2, "Pic2.png"));
        loader.absorb(LoadEvent {
            slot: AssetSlot::Audio,
            payload: LoadPayload::Failed(ResourceError::Read {
                path: "Run.flac".to_string(),
                message: "No such file".to_string(),
            }),
        });

        assert!(loader.is_complete());
        assert_eq!(loader.progress().percent(), 100);

        let mut store = loader.finish();
        assert_eq!(store.image_paths(), ["Pic2.png"]);
        assert!(store.take_audio().is_none());
    }

    #[test]
    fn test_total_failure_completes_empty() {
        let (_tx, mut loader) = AssetLoader::with_channel(2);

        loader.absorb(failed_event(1, 1));
        loader.absorb(LoadEvent {
            slot: AssetSlot::Audio,
            payload: LoadPayload::Failed(ResourceError::Read {
                path: "Run.flac".to_string(),
                message: "No such file".to_string(),
            }),
        });

        assert!(loader.is_complete());
        let store = loader.finish();
        assert!(store.image_paths().is_empty());
    }

    #[test]
    fn test_audio_handoff() {
        let (_tx, mut loader) = AssetLoader::with_channel(1);
        loader.absorb(LoadEvent {
            slot: AssetSlot::Audio,
            payload: LoadPayload::Audio(vec![1, 2, 3]),
        });

        assert_eq!(loader.status(), "音频加载完成");
        let mut store = loader.finish();
        assert_eq!(store.take_audio(), Some(vec![1, 2, 3]));
        // 交接是一次性的
        assert_eq!(store.take_audio(), None);
    }

    #[test]
    fn test_pump_drains_channel() {
        let (tx, mut loader) = AssetLoader::with_channel(2);
        tx.send(image_event(1, 2, "Pic1.png")).unwrap();
        tx.send(image_event(2, 2, "Pic2.png")).unwrap();

        loader.pump();
        assert!(loader.is_complete());
        assert_eq!(loader.images.len(), 2);
    }

    #[test]
    fn test_start_with_missing_files_settles() {
        // 所有文件都不存在：每个任务仍应恰好结算一次
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.assets_root = dir.path().to_path_buf();
        config.slideshow.image_count = 3;

        let mut loader = AssetLoader::start(&config);
        for _ in 0..200 {
            loader.pump();
            if loader.is_complete() {
                break;
            }
            thread::sleep(std::time::Duration::from_millis(5));
        }

        assert!(loader.is_complete());
        assert_eq!(loader.progress().loaded(), 4);
        assert!(loader.images.is_empty());
    }
}
