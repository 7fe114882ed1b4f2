use crate::recovery::RESET_CODE_TTL_MINUTES;

pub fn render_reset_code(code: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2 style="color: #22c55e;">IbadahKu</h2>
    <p>Use the following code to reset your password:</p>
    <p style="font-size: 32px; font-weight: bold; letter-spacing: 8px; color: #22c55e;">{code}</p>
    <p style="color: #666; font-size: 14px;">This code expires in {RESET_CODE_TTL_MINUTES} minutes. If you didn't request a reset, you can ignore this email.</p>
</body>
</html>"#
    )
}
