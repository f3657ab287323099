//! 调度结果
//!
//! 每次调度恰好产生三种结果之一：
//! - `Success`：请求被接受；
//! - `Failure`：请求按规则被拒绝，携带已翻译的通知上下文；
//! - `Exception`：发生了意料之外的错误。
//!
use crate::dto::NotificationContextDto;
use crate::error::AppError;

#[derive(Debug)]
pub enum DispatchResult<T> {
    Success(T),
    Failure(Vec<NotificationContextDto>),
    Exception(AppError),
}

impl<T> DispatchResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    pub fn is_exception(&self) -> bool {
        matches!(self, Self::Exception(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&[NotificationContextDto]> {
        match self {
            Self::Failure(contexts) => Some(contexts),
            _ => None,
        }
    }

    pub fn exception(&self) -> Option<&AppError> {
        match self {
            Self::Exception(err) => Some(err),
            _ => None,
        }
    }

    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> DispatchResult<U> {
        match self {
            Self::Success(value) => DispatchResult::Success(f(value)),
            Self::Failure(contexts) => DispatchResult::Failure(contexts),
            Self::Exception(err) => DispatchResult::Exception(err),
        }
    }

    pub fn if_success(self, f: impl FnOnce(&T)) -> Self {
        if let Self::Success(value) = &self {
            f(value);
        }
        self
    }

    pub fn if_failure(self, f: impl FnOnce(&[NotificationContextDto])) -> Self {
        if let Self::Failure(contexts) = &self {
            f(contexts);
        }
        self
    }

    pub fn if_exception(self, f: impl FnOnce(&AppError)) -> Self {
        if let Self::Exception(err) = &self {
            f(err);
        }
        self
    }
}

/// 命令扇出结果的便捷查询
pub trait DispatchResults<T> {
    fn first_success(&self) -> Option<&T>;

    fn all_succeeded(&self) -> bool;

    fn failures(&self) -> Vec<&NotificationContextDto>;
}

impl<T> DispatchResults<T> for [DispatchResult<T>] {
    fn first_success(&self) -> Option<&T> {
        self.iter().find_map(DispatchResult::success)
    }

    fn all_succeeded(&self) -> bool {
        !self.is_empty() && self.iter().all(DispatchResult::is_success)
    }

    fn failures(&self) -> Vec<&NotificationContextDto> {
        self.iter()
            .filter_map(DispatchResult::failure)
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::NotificationDto;

    fn failure() -> DispatchResult<u32> {
        DispatchResult::Failure(vec![NotificationContextDto {
            context: "Order".into(),
            notifications: vec![NotificationDto {
                field_name: None,
                field_value: None,
                fun_name: None,
                message: "no".into(),
            }],
        }])
    }

    #[test]
    fn exactly_one_variant_is_visible() {
        let ok = DispatchResult::Success(7u32);
        assert!(ok.is_success() && !ok.is_failure() && !ok.is_exception());
        assert_eq!(ok.map(|v| v * 2).into_success(), Some(14));

        let failed = failure();
        assert!(failed.success().is_none());
        assert_eq!(failed.failure().unwrap()[0].context, "Order");

        let broken = DispatchResult::<u32>::Exception(AppError::Cancelled);
        assert!(matches!(broken.exception(), Some(AppError::Cancelled)));
    }

    #[test]
    fn callbacks_fire_only_for_their_variant() {
        let mut seen = Vec::new();
        let _ = failure()
            .if_success(|_| seen.push("success"))
            .if_failure(|_| seen.push("failure"))
            .if_exception(|_| seen.push("exception"));
        assert_eq!(seen, vec!["failure"]);
    }

    #[test]
    fn fan_out_helpers() {
        let results = vec![failure(), DispatchResult::Success(1), DispatchResult::Success(2)];
        assert_eq!(results.first_success(), Some(&1));
        assert!(!results.all_succeeded());
        assert_eq!(results.failures().len(), 1);

        let empty: Vec<DispatchResult<u32>> = Vec::new();
        assert!(!empty.all_succeeded());
    }
}
