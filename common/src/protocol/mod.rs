//! 内部通信协议类型定义
//!
//! 此模块定义了面板与代理引擎之间通信的共享类型，
//! 包括 EngineControl trait、TrafficSource trait 以及流量上报结构体。

pub mod control;
pub mod traffic;
