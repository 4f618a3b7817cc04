use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::plugin::prelude::*;

mod client;

pub use client::Client;

/// The chat command that triggers a like.
pub const LIKE_COMMAND: ChatCommand = ChatCommand::new("点赞");
/// The number of likes sent when the command has no count.
pub const DEFAULT_TIMES: u32 = 10;
/// The highest number of likes a single command sends; larger counts are clamped to it.
pub const MAX_TIMES: u32 = 20;
/// Part of the OneBot failure message sent once the daily like quota for a user is used up.
pub const DAILY_LIMIT_MARKER: &str = "今日同一好友点赞数已达上限";
/// The failure message used when the OneBot API does not answer in time.
pub const TIMEOUT_MESSAGE: &str = "请求超时";

/// A validated request to like a user.
///
/// Serializes to the JSON body of the `send_like` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikeRequest {
    /// The user to like.
    pub user_id: String,
    /// The number of likes, in `1..=MAX_TIMES`.
    pub times: u32,
}

/// The outcome of a `send_like` action as reported by the OneBot API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceResult {
    /// The likes were sent.
    Ok,
    /// The API refused or failed to send the likes.
    Failed {
        /// The reason given by the API, if any.
        message: Option<String>,
    },
    /// The response did not carry a known status.
    Unrecognized,
}

impl ServiceResult {
    /// Returns a failure with the given `message`.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: Some(message.into()),
        }
    }

    /// Interprets a decoded OneBot response body.
    ///
    /// Only the `status` and `message` fields are looked at; anything that isn't an object with a
    /// `status` of `"ok"` or `"failed"` is [`ServiceResult::Unrecognized`].
    #[must_use]
    pub fn from_response(body: &Value) -> Self {
        match body.get("status").and_then(Value::as_str) {
            Some("ok") => Self::Ok,
            Some("failed") => Self::Failed {
                message: body.get("message").and_then(message_text),
            },
            _ => Self::Unrecognized,
        }
    }
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Parses a chat message as a like command and returns the number of likes it asks for.
///
/// `点赞` asks for [`DEFAULT_TIMES`] likes and `点赞 <n>` for `n` likes, clamped to
/// [`MAX_TIMES`]. Counts below 1 and anything that isn't an integer are not a like command.
#[must_use]
pub fn parse_like_message(message: &str) -> Option<u32> {
    let args = LIKE_COMMAND.parse(message.trim())?;

    if args.is_empty() {
        return Some(DEFAULT_TIMES);
    }

    parse_times(args.trim())
}

fn parse_times(s: &str) -> Option<u32> {
    use std::num::IntErrorKind;

    match ascii_integer(s)?.parse::<i64>() {
        Ok(times) if times >= 1 => Some(u32::try_from(times).map_or(MAX_TIMES, |t| t.min(MAX_TIMES))),
        Ok(_) => None,
        // Still a positive integer, just a very large one.
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => Some(MAX_TIMES),
        Err(_) => None,
    }
}

/// Code points of the digit zero of each block of ten consecutive decimal digits.
const DIGIT_ZEROS: &[u32] = &[
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6,
];

/// Returns the value of `c` if it is a decimal digit of any script, e.g. `５` or `٣`.
fn decimal_digit(c: char) -> Option<u8> {
    let c = u32::from(c);

    DIGIT_ZEROS
        .iter()
        .find(|&&zero| (zero..zero + 10).contains(&c))
        .and_then(|zero| u8::try_from(c - zero).ok())
}

/// Rewrites an integer literal to ASCII: an optional sign followed by decimal digits of any
/// script, with single underscores allowed between digits.
fn ascii_integer(s: &str) -> Option<String> {
    let mut chars = s.chars().peekable();
    let mut out = String::with_capacity(s.len());

    if let Some(sign) = chars.next_if(|c| matches!(c, '+' | '-')) {
        out.push(sign);
    }

    let mut after_digit = false;

    while let Some(c) = chars.next() {
        if c == '_' {
            // Underscores must sit between two digits.
            if !after_digit || !chars.peek().is_some_and(|&next| decimal_digit(next).is_some()) {
                return None;
            }

            after_digit = false;
        } else {
            out.push(char::from(b'0' + decimal_digit(c)?));
            after_digit = true;
        }
    }

    after_digit.then_some(out)
}

/// Renders the chat reply for the outcome of liking `user_id` `times` times.
#[must_use]
pub fn reply_message(result: &ServiceResult, user_id: &str, times: u32) -> String {
    match result {
        ServiceResult::Ok => format!("✅ 点赞成功！已为用户 {user_id} 点赞 {times} 次"),
        ServiceResult::Failed { message } => {
            let message = message.as_deref().unwrap_or("未知错误");

            if message.contains(DAILY_LIMIT_MARKER) {
                "❌ 点赞失败：今日对该用户的点赞次数已达上限".to_string()
            } else {
                format!("❌ 点赞失败：{message}")
            }
        }
        ServiceResult::Unrecognized => "❓ 点赞结果未知，请检查Napcat服务状态".to_string(),
    }
}

/// Likes the sender of a like command through the OneBot API.
pub struct SendLike {
    /// OneBot API client.
    client: Client,
}

impl SendLike {
    /// Creates the plugin for the OneBot API at `onebot_api_url`.
    #[must_use]
    pub fn with_api_url(onebot_api_url: &str) -> Self {
        Self {
            client: Client::new(onebot_api_url),
        }
    }

    /// Creates the plugin with a preconfigured client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Plugin for SendLike {
    fn new(config: &Config) -> Self {
        Self::with_api_url(&config.onebot_api_url)
    }

    fn name() -> Name {
        Name("send_like")
    }

    fn author() -> Author {
        Author("HwlloChen")
    }

    fn version() -> Version {
        Version("0.1.1")
    }

    fn events() -> &'static [EventKind] {
        &[EventKind::PersonMessage, EventKind::GroupMessage]
    }

    async fn initialize(&self) -> Result<(), SendLikeError> {
        info!(endpoint = %self.client.endpoint(), "send_like plugin loaded");

        Ok(())
    }

    async fn shutdown(&self) {
        info!("send_like plugin unloaded");
    }
}

#[async_trait]
impl EventHandler for SendLike {
    async fn handle(&self, ctx: &mut EventContext) -> Result<(), SendLikeError> {
        let event = ctx.event();
        let Some(times) = parse_like_message(&event.text) else {
            return Ok(());
        };
        let request = LikeRequest {
            user_id: event.sender_id.trim().to_string(),
            times,
        };

        info!(user_id = %request.user_id, times, kind = %event.kind, "received like request");

        let result = self.client.send_like(&request).await;
        let reply = reply_message(&result, &request.user_id, request.times);

        ctx.reply(reply);
        ctx.prevent_default();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn it_should_default_bare_command_to_ten() {
        assert_eq!(parse_like_message("点赞"), Some(10));
        assert_eq!(parse_like_message("  点赞\n"), Some(10));
    }

    #[test]
    fn it_should_accept_counts_in_range() {
        for n in 1..=20 {
            assert_eq!(parse_like_message(&format!("点赞 {n}")), Some(n));
        }

        assert_eq!(parse_like_message("点赞   7 "), Some(7));
        assert_eq!(parse_like_message("点赞 +3"), Some(3));
    }

    #[test]
    fn it_should_clamp_large_counts() {
        assert_eq!(parse_like_message("点赞 21"), Some(20));
        assert_eq!(parse_like_message("点赞 25"), Some(20));
        assert_eq!(parse_like_message("点赞 4294967296"), Some(20));
        assert_eq!(parse_like_message("点赞 99999999999999999999999"), Some(20));
    }

    #[test]
    fn it_should_ignore_counts_below_one() {
        assert_eq!(parse_like_message("点赞 0"), None);
        assert_eq!(parse_like_message("点赞 -1"), None);
        assert_eq!(parse_like_message("点赞 -99999999999999999999999"), None);
    }

    #[test]
    fn it_should_ignore_non_numeric_counts() {
        assert_eq!(parse_like_message("点赞 abc"), None);
        assert_eq!(parse_like_message("点赞 2.5"), None);
        assert_eq!(parse_like_message("点赞 5 times"), None);
        assert_eq!(parse_like_message("点赞 一"), None);
        assert_eq!(parse_like_message("点赞 ²"), None);
        assert_eq!(parse_like_message("点赞 +"), None);
    }

    #[test]
    fn it_should_accept_fullwidth_counts() {
        assert_eq!(parse_like_message("点赞 ５"), Some(5));
        assert_eq!(parse_like_message("点赞 １２"), Some(12));
        assert_eq!(parse_like_message("点赞 ２５"), Some(20));
        assert_eq!(parse_like_message("点赞 ０"), None);
        assert_eq!(parse_like_message("点赞 －５"), None);
    }

    #[test]
    fn it_should_accept_decimal_digits_of_other_scripts() {
        assert_eq!(parse_like_message("点赞 ٣"), Some(3));
        assert_eq!(parse_like_message("点赞 १५"), Some(15));
    }

    #[test]
    fn it_should_accept_underscores_between_digits() {
        assert_eq!(parse_like_message("点赞 1_0"), Some(10));
        assert_eq!(parse_like_message("点赞 1_000"), Some(20));
        assert_eq!(parse_like_message("点赞 1__0"), None);
        assert_eq!(parse_like_message("点赞 _10"), None);
        assert_eq!(parse_like_message("点赞 10_"), None);
        assert_eq!(parse_like_message("点赞 +_1"), None);
    }

    #[test]
    fn it_should_ignore_other_messages() {
        assert_eq!(parse_like_message("hello"), None);
        assert_eq!(parse_like_message(""), None);
        assert_eq!(parse_like_message("点赞5"), None);
        assert_eq!(parse_like_message("点赞\t5"), None);
        assert_eq!(parse_like_message("给我点赞"), None);
        assert_eq!(parse_like_message("赞 5"), None);
    }

    #[test]
    fn it_should_interpret_response_status() {
        assert_eq!(
            ServiceResult::from_response(&json!({ "status": "ok", "retcode": 0 })),
            ServiceResult::Ok
        );
        assert_eq!(
            ServiceResult::from_response(&json!({ "status": "failed", "message": "boom" })),
            ServiceResult::failed("boom")
        );
        assert_eq!(
            ServiceResult::from_response(&json!({ "status": "failed" })),
            ServiceResult::Failed { message: None }
        );
        assert_eq!(
            ServiceResult::from_response(&json!({ "status": "failed", "message": 1200 })),
            ServiceResult::failed("1200")
        );
        assert_eq!(
            ServiceResult::from_response(&json!({ "status": "async" })),
            ServiceResult::Unrecognized
        );
        assert_eq!(ServiceResult::from_response(&json!({})), ServiceResult::Unrecognized);
        assert_eq!(ServiceResult::from_response(&json!([1, 2])), ServiceResult::Unrecognized);
    }

    #[test]
    fn it_should_reply_with_user_and_count_on_success() {
        let reply = reply_message(&ServiceResult::Ok, "U123", 7);

        assert!(reply.contains("成功"));
        assert!(reply.contains("U123"));
        assert!(reply.contains('7'));
    }

    #[test]
    fn it_should_replace_daily_limit_message() {
        let result = ServiceResult::failed("今日同一好友点赞数已达上限");
        let reply = reply_message(&result, "U1", 5);

        assert_eq!(reply, "❌ 点赞失败：今日对该用户的点赞次数已达上限");
        assert!(!reply.contains(DAILY_LIMIT_MARKER));
    }

    #[test]
    fn it_should_echo_other_failures() {
        let reply = reply_message(&ServiceResult::failed("boom"), "U1", 5);

        assert_eq!(reply, "❌ 点赞失败：boom");
    }

    #[test]
    fn it_should_default_missing_failure_message() {
        let reply = reply_message(&ServiceResult::Failed { message: None }, "U1", 5);

        assert_eq!(reply, "❌ 点赞失败：未知错误");
    }

    #[test]
    fn it_should_report_unknown_result() {
        let result = ServiceResult::from_response(&json!({}));

        assert_eq!(
            reply_message(&result, "U1", 5),
            "❓ 点赞结果未知，请检查Napcat服务状态"
        );
    }
}
