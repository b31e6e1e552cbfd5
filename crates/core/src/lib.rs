pub mod error;
pub mod event;
pub mod history;
pub mod sample;
pub mod state;
pub mod widget;

pub use error::{Result, RtpmError};
pub use event::Message;
pub use history::{HistorySnapshot, RollingBufferSet, RollingSeries, Signal};
pub use sample::{CanonicalSample, CpuInfo, GpuInfo, MemoryInfo, ProcessInfo, ProcessStatus};
pub use state::{ConnectionStatus, DashState, HubState};
pub use widget::DashWidget;
