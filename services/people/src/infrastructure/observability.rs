//! 分布式追踪 Span 辅助函数

use tracing::Span;

/// 创建数据库操作 Span
pub fn db_span(operation: &str, table: &str) -> Span {
    tracing::info_span!("db", operation = operation, table = table)
}
