//! Domain identifiers (strongly-typed IDs).
//!
//! ボード側の ID（Trello の card id / list id）は不透明な文字列です。
//! Phantom type パターンで `TaskId` と `StageId` を別の型にして、
//! 「カード ID をリスト ID として渡す」ミスをコンパイル時に防ぎます。

use std::fmt;
use std::marker::PhantomData;

/// IdMarker は各 ID 型のマーカー trait
///
/// ログやエラーメッセージで使うラベル（"task", "stage"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn label() -> &'static str;
}

/// ジェネリック ID 型
///
/// 中身はボードが払い出した文字列そのもの。`Display` は生の値を出すので
/// そのまま API のパスやクエリに使えます。
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T: IdMarker> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T: IdMarker> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> From<String> for Id<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T: IdMarker> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", T::label(), self.value)
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Task (card) のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Card {}

impl IdMarker for Card {
    fn label() -> &'static str {
        "task"
    }
}

/// Pipeline stage (list) のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {}

impl IdMarker for Stage {
    fn label() -> &'static str {
        "stage"
    }
}

/// Identifier of a task on the board.
pub type TaskId = Id<Card>;

/// Identifier of a pipeline stage (an ordered bucket of tasks).
pub type StageId = Id<Stage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_raw_board_value() {
        let id = TaskId::new("55b2fb01d72f8d313d8e9acc");
        assert_eq!(id.to_string(), "55b2fb01d72f8d313d8e9acc");
        assert_eq!(id.as_str(), "55b2fb01d72f8d313d8e9acc");
    }

    #[test]
    fn debug_carries_the_kind_label() {
        let task = TaskId::new("a1");
        let stage = StageId::new("a1");
        assert_eq!(format!("{task:?}"), "task:a1");
        assert_eq!(format!("{stage:?}"), "stage:a1");
        // let _: TaskId = stage; // <- does not compile
    }
}
