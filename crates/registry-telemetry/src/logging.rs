//! Structured log helpers.
//!
//! Every line logged through these macros carries a `participant` field so
//! the output of several registry participants can be told apart, in pretty
//! as well as JSON mode.

/// Log with a `participant` field attached.
///
/// ```rust,ignore
/// log_event!(info, "pinger", "Ping received", round = 3);
/// ```
#[macro_export]
macro_rules! log_event {
    (info, $participant:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            participant = $participant,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $participant:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            participant = $participant,
            $($($field)*,)?
            $msg
        )
    };

    (error, $participant:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            participant = $participant,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $participant:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            participant = $participant,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log the outcome of one delivery slot with standard fields.
#[macro_export]
macro_rules! log_delivery {
    ($level:ident, $participant:expr, $msg:expr, $event_type:expr, $subscriber:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            participant = $participant,
            event_type = %$event_type,
            subscriber = %$subscriber,
            $($($field)*,)?
            $msg
        )
    };
}
