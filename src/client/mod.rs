//! 轮询客户端
//!
//! [`ChatClient`] 封装 HTTP API，[`ConversationView`] 负责把轮询结果合并成本地视图。

pub mod api;
pub mod view;

pub use api::{
    run_sync_loop, ChatClient, ClientError, ClientResult, LanguageEntry, DEFAULT_POLL_INTERVAL,
};
pub use view::ConversationView;
