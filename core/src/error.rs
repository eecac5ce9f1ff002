use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("入力値が不正です: {0}")]
    InvalidInput(String),

    #[error("指定された国が存在しません: {0}")]
    UnknownCountry(usize),

    #[error("未知の法律です: {0}")]
    UnknownLaw(String),

    #[error("未知の政体です: {0}")]
    UnknownGovernmentType(String),

    #[error("未知の外交行動です: {0}")]
    UnknownDiplomaticAction(String),

    #[error("内部整合性エラー: {0}")]
    InvariantViolation(String),
}

pub type SimResult<T> = std::result::Result<T, SimError>;
