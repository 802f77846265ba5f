//! Fixed diagnostics for non-success HTTP statuses returned by the chat API.

const STATUS_MESSAGES: [(u16, &str); 7] = [
    (
        400,
        "400 - Invalid format (格式错误): the request body is malformed; fix it according to the error details.",
    ),
    (
        401,
        "401 - Authentication failed (认证失败): the API key is invalid; check that your apiKey is correct.",
    ),
    (
        402,
        "402 - Insufficient balance (余额不足): the account balance is too low; top up the account and retry.",
    ),
    (
        422,
        "422 - Invalid parameters (参数错误): the request parameters are invalid; adjust them according to the error details.",
    ),
    (
        429,
        "429 - Rate limit reached (请求速率达到上限): too many requests (TPM or RPM); slow down and retry later.",
    ),
    (
        500,
        "500 - Server error (服务器故障): the server hit an internal fault; wait and retry, and contact support if it persists.",
    ),
    (
        503,
        "503 - Server overloaded (服务器繁忙): the server is under heavy load; retry your request later.",
    ),
];

pub fn describe(code: u16) -> String {
    STATUS_MESSAGES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, message)| (*message).to_string())
        .unwrap_or_else(|| {
            format!("Unknown error (未知错误): received unhandled HTTP status code {code}.")
        })
}
