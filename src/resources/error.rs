//! 资源加载链路的错误类型。

use thiserror::Error;

/// 单个资源的失败原因
///
/// 读取与解码分开记录，方便在日志里区分是文件缺失还是内容损坏。
#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    /// 文件读不到（不存在、无权限等）
    #[error("无法读取 {path}: {message}")]
    Read {
        path: String,
        message: String,
    },

    /// 内容不是期望的格式
    #[error("{path} 无法解码为{kind}: {message}")]
    Decode {
        path: String,
        /// 资源类别（图片、音频）
        kind: String,
        message: String,
    },
}
