use crate::os_context::Platform;

/// Words that suggest a message is asking for something a terminal command can do.
/// English and Vietnamese phrasings are both recognised.
const COMMAND_INDICATORS: &[&str] = &[
    "how to", "làm sao", "làm thế nào",
    "show", "hiển thị", "xem",
    "list", "liệt kê",
    "delete", "xóa",
    "create", "tạo",
    "move", "di chuyển",
    "copy", "sao chép",
    "run", "chạy",
    "start", "bắt đầu",
    "stop", "dừng",
    "restart", "khởi động lại",
    "find", "tìm",
    "change", "thay đổi",
    "update", "cập nhật",
    "install", "cài đặt",
    "remove", "gỡ bỏ",
    "clear",
    "check", "kiểm tra",
    "open", "mở",
];

/// Whether `content` reads like a request for a command
pub fn is_command_like(content: &str) -> bool {
    let lowered = content.to_lowercase();
    COMMAND_INDICATORS
        .iter()
        .any(|indicator| lowered.contains(indicator))
}

/// Prepare a CLI Assistant message: command-like requests get an OS hint so the
/// model answers with a platform-appropriate `COMMAND:` line; anything else is
/// passed through untouched.
pub fn wrap_for_cli(content: &str, platform: Platform) -> String {
    if is_command_like(content) {
        format!(
            "If this text describes a command to execute, suggest the appropriate command for {} OS. If not, respond normally: {}",
            platform.display_name(),
            content
        )
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_like_english() {
        assert!(is_command_like("List all files in this folder"));
        assert!(is_command_like("how to check disk space"));
        assert!(is_command_like("Please INSTALL git"));
    }

    #[test]
    fn test_command_like_vietnamese() {
        assert!(is_command_like("liệt kê các tệp"));
        assert!(is_command_like("Làm sao để xem dung lượng ổ đĩa"));
    }

    #[test]
    fn test_not_command_like() {
        assert!(!is_command_like("What is the capital of France?"));
        assert!(!is_command_like("Tell me a joke"));
    }

    #[test]
    fn test_wrap_adds_os_hint() {
        let wrapped = wrap_for_cli("show current directory", Platform::Windows);
        assert!(wrapped.contains("for Windows OS"));
        assert!(wrapped.ends_with("show current directory"));
    }

    #[test]
    fn test_wrap_passthrough() {
        assert_eq!(wrap_for_cli("hello there", Platform::Linux), "hello there");
    }
}
