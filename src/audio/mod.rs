//! # Audio 模块
//!
//! 背景音乐管理，使用 rodio 库实现。
//!
//! ## 设计说明
//!
//! - 音频句柄由应用显式持有，加载器探测通过后把字节交接到这里
//! - 播放必须由用户手势触发：`activate` 可重复调用，直到首次成功
//! - 所有失败只记日志并吞掉，不会中断主循环

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use tracing::{debug, info, warn};

/// 音频管理器
///
/// 负责背景音乐的激活、暂停与音量控制。输出设备在首次激活时才打开。
pub struct AudioManager {
    /// 音频输出流（必须保持存活）
    _stream: Option<OutputStream>,
    /// 音频输出句柄
    stream_handle: Option<OutputStreamHandle>,
    /// 播放器
    sink: Option<Sink>,
    /// 待播放的音频字节（来自加载器）
    bytes: Option<Vec<u8>>,
    /// 音量 (0.0 - 1.0)
    volume: f32,
    /// 是否静音
    muted: bool,
}

impl AudioManager {
    /// 创建新的音频管理器
    pub fn new(volume: f32, muted: bool) -> Self {
        Self {
            _stream: None,
            stream_handle: None,
            sink: None,
            bytes: None,
            volume: volume.clamp(0.0, 1.0),
            muted,
        }
    }

    /// 接收加载器交接的音频字节
    pub fn attach(&mut self, bytes: Vec<u8>) {
        self.bytes = Some(bytes);
    }

    /// 是否持有可播放的音轨
    pub fn has_track(&self) -> bool {
        self.bytes.is_some() || self.sink.is_some()
    }

    /// 是否已激活播放
    pub fn is_active(&self) -> bool {
        self.sink.is_some()
    }

    /// 尝试激活播放（由用户手势触发，可重复调用直到成功）
    ///
    /// 返回是否激活成功。失败（无音轨、无输出设备、解码失败）只记
    /// 日志，下一次手势会再次尝试。
    pub fn activate(&mut self) -> bool {
        if self.sink.is_some() {
            return true;
        }

        let Some(ref bytes) = self.bytes else {
            debug!("没有可播放的音轨，跳过激活");
            return false;
        };

        if self.stream_handle.is_none() {
            match OutputStream::try_default() {
                Ok((stream, handle)) => {
                    self._stream = Some(stream);
                    self.stream_handle = Some(handle);
                }
                Err(e) => {
                    warn!(error = %e, "无法初始化音频输出，等待下次手势重试");
                    return false;
                }
            }
        }

        let source = match Decoder::new(Cursor::new(bytes.clone())) {
            Ok(source) => source,
            Err(e) => {
                warn!(error = %e, "音频解码失败，等待下次手势重试");
                return false;
            }
        };

        let Some(ref handle) = self.stream_handle else {
            return false;
        };
        let sink = match Sink::try_new(handle) {
            Ok(sink) => sink,
            Err(e) => {
                warn!(error = %e, "无法创建音频播放器，等待下次手势重试");
                return false;
            }
        };

        sink.set_volume(self.effective_volume());
        sink.append(source.repeat_infinite());
        sink.play();
        self.sink = Some(sink);

        info!("背景音乐已激活");
        true
    }

    /// 暂停播放（窗口失活 / 用户暂停）
    pub fn pause_playback(&self) {
        if let Some(ref sink) = self.sink {
            sink.pause();
            debug!("背景音乐已暂停");
        }
    }

    /// 恢复播放（尽力而为，未激活时无动作）
    pub fn resume_playback(&self) {
        if let Some(ref sink) = self.sink {
            sink.play();
            debug!("背景音乐已恢复");
        }
    }

    /// 设置音量
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(ref sink) = self.sink {
            sink.set_volume(self.effective_volume());
        }
    }

    /// 获取音量
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// 设置静音状态
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(ref sink) = self.sink {
            sink.set_volume(self.effective_volume());
        }
    }

    /// 是否静音
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// 停止播放并释放输出设备（可重复调用）
    pub fn shutdown(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
            info!("背景音乐已停止");
        }
        self.stream_handle = None;
        self._stream = None;
        self.bytes = None;
    }

    /// 获取有效音量（考虑静音状态）
    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_settings() {
        let mut manager = AudioManager::new(0.7, false);
        manager.set_volume(0.5);
        assert_eq!(manager.volume(), 0.5);

        // 测试音量限制
        manager.set_volume(1.5);
        assert_eq!(manager.volume(), 1.0);
        manager.set_volume(-0.5);
        assert_eq!(manager.volume(), 0.0);
    }

    #[test]
    fn test_activate_without_track_fails_quietly() {
        let mut manager = AudioManager::new(0.7, false);
        assert!(!manager.has_track());
        assert!(!manager.activate());
        assert!(!manager.is_active());
    }

    #[test]
    fn test_attach_then_has_track() {
        let mut manager = AudioManager::new(0.7, false);
        manager.attach(vec![0u8; 8]);
        assert!(manager.has_track());
    }

    #[test]
    fn test_shutdown_idempotent() {
        let mut manager = AudioManager::new(0.7, false);
        manager.attach(vec![0u8; 8]);
        manager.shutdown();
        assert!(!manager.has_track());
        // 再次关闭应当无动作
        manager.shutdown();
        // 关闭后暂停 / 恢复也应当无动作
        manager.pause_playback();
        manager.resume_playback();
    }

    #[test]
    fn test_mute_effective_volume() {
        let mut manager = AudioManager::new(0.7, false);
        manager.set_muted(true);
        assert!(manager.is_muted());
        assert_eq!(manager.effective_volume(), 0.0);
        manager.set_muted(false);
        assert!((manager.effective_volume() - 0.7).abs() < f32::EPSILON);
    }
}
