//! HTML pages for the attend flow.
//!
//! The check-in endpoint is opened by a phone camera after scanning a QR
//! code, so every outcome renders a small self-contained mobile page.
//! Interpolated sheet values are escaped before embedding.

use std::fmt::Write;

/// Escapes text for safe interpolation into HTML.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wraps page content in the shared document shell.
fn document(title: &str, heading_color: &str, body: &str) -> String {
    let mut page = String::with_capacity(body.len() + 512);
    let _ = write!(
        page,
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title}</title>\n\
         <style>\n\
         body {{ font-family: Arial, sans-serif; padding: 20px; text-align: center; }}\n\
         h2 {{ color: {heading_color}; }}\n\
         .success {{ background: #d4edda; color: #155724; padding: 15px; border-radius: 5px; margin: 20px 0; }}\n\
         .error {{ background: #f8d7da; color: #721c24; padding: 15px; border-radius: 5px; margin: 20px 0; }}\n\
         .info {{ background: #f8f9fa; padding: 15px; border-radius: 5px; margin: 20px 0; }}\n\
         </style>\n\
         </head>\n\
         <body>\n{body}\n</body>\n\
         </html>\n"
    );
    page
}

/// 400 page: the QR token query parameter is missing.
pub fn missing_token() -> String {
    document(
        "錯誤",
        "#dc3545",
        "<h2>❌ 缺少簽到代碼</h2>\n<p>請使用正確的 QR Code 掃描</p>",
    )
}

/// 200 page: the attendance cell already carries the attended marker.
pub fn already_checked_in(recorded: &str) -> String {
    let body = format!(
        "<h2>⚠️ 你已經簽到過了</h2>\n\
         <div class=\"info\">\n<p>原簽到記錄：{}</p>\n</div>",
        escape(recorded)
    );
    document("已簽到", "#ffc107", &body)
}

/// 200 page: attendance recorded just now.
pub fn checkin_success(
    datetime: &str,
    student_id: &str,
    name: &str,
    class: &str,
    notified: bool,
) -> String {
    let notice = if notified {
        "<p>✅ 已發送通知給家長</p>"
    } else {
        "<p>⚠️ 未發送家長通知</p>"
    };
    let body = format!(
        "<h2>✅ 簽到成功！</h2>\n\
         <div class=\"success\">\n<p><strong>簽到時間：</strong>{}</p>\n</div>\n\
         <div class=\"info\">\n\
         <p>學號：{}</p>\n\
         <p>姓名：{}</p>\n\
         <p>班級：{}</p>\n\
         {notice}\n\
         </div>",
        escape(datetime),
        escape(student_id),
        escape(name),
        escape(class),
    );
    document("簽到成功", "#28a745", &body)
}

/// 404 page: no roster matched the student ID.
pub fn not_found(student_id: &str) -> String {
    let body = format!(
        "<h2>❌ 簽到失敗</h2>\n\
         <div class=\"error\">\n\
         <p>找不到學號或尚未建立今日欄位</p>\n\
         <p>請聯絡教務老師確認 QR code 與出席表格</p>\n\
         </div>\n\
         <p style=\"color: #666; font-size: 14px;\">學號：{}</p>",
        escape(student_id)
    );
    document("簽到失敗", "#dc3545", &body)
}

/// 500 page: upstream failure; details stay in the server log.
pub fn server_error() -> String {
    document(
        "系統錯誤",
        "#dc3545",
        "<h2>❌ 系統錯誤</h2>\n\
         <p>伺服器發生錯誤，請稍後再試</p>\n\
         <p style=\"color: #666; font-size: 14px;\">如果問題持續，請聯絡系統管理員</p>",
    )
}
