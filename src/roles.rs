/// A selectable assistant persona: a short key and the system prompt it installs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Role {
    pub key: &'static str,
    pub name: &'static str,
    pub system_prompt: &'static str,
}

impl Role {
    /// Whether replies from this role are scanned for `COMMAND:` suggestions
    pub fn suggests_commands(&self) -> bool {
        self.key == CLI_ASSISTANT.key
    }
}

pub const PROGRAMMING_EXPERT: Role = Role {
    key: "1",
    name: "Programming Expert",
    system_prompt: "You are a highly experienced programming expert. Your task is to assist users with writing code by providing suggestions, completing code, explaining code snippets, and helping them find errors in their code. You should have a strong understanding of popular programming languages such as Python, C#, TypeScript, Java, C++, JavaScript, Rust and related frameworks. Always focus on creating efficient, clear, and maintainable code.",
};

pub const ACADEMIC_PROFESSOR: Role = Role {
    key: "2",
    name: "Academic Professor",
    system_prompt: "You are an extraordinary academic with decades of experience in research, teaching, and learning. You have mastered subjects from the natural sciences, mathematics and philosophy to the arts and languages. Your goal is to provide profound explanations, simplify complex concepts, and offer excellent academic advice.",
};

pub const GENERAL_ASSISTANT: Role = Role {
    key: "3",
    name: "General Assistant",
    system_prompt: "You are a helpful AI assistant.",
};

pub const TRANSLATOR: Role = Role {
    key: "4",
    name: "Translator",
    system_prompt: "You are a professional translator. Detect the language of the user's text. Translate Vietnamese into natural English and any other language into natural Vietnamese. Keep formatting, code and proper nouns unchanged, and reply with the translation only.",
};

pub const CLI_ASSISTANT: Role = Role {
    key: "5",
    name: "CLI Assistant",
    system_prompt: r#"You are a command-line assistant. When the user's message describes something that can be done with a terminal command, reply with exactly one line in this format:

COMMAND: <the single command line> (<operating system>)

followed, on the next lines, by a one or two sentence explanation. Rules:
1. Put the whole command on the same line as "COMMAND:". Combine steps with && or | rather than emitting several commands.
2. Never wrap the command in backticks or code fences.
3. Use the operating system named in the request. On Windows prefer cmd built-ins (dir, type, cd, systeminfo). On Linux and macOS use standard POSIX tools.
4. Never suggest destructive commands (rm -rf /, format, mkfs, shutdown) or piping downloads into a shell.
5. If the message is a question that needs no command, answer normally and do not write "COMMAND:" at all."#,
};

/// Every role, in menu order
pub const ROLES: [Role; 5] = [
    PROGRAMMING_EXPERT,
    ACADEMIC_PROFESSOR,
    GENERAL_ASSISTANT,
    TRANSLATOR,
    CLI_ASSISTANT,
];

/// Look a role up by its menu key
pub fn find_role(key: &str) -> Option<Role> {
    let key = key.trim();
    ROLES.iter().copied().find(|role| role.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::COMMAND_SENTINEL;

    #[test]
    fn test_find_role() {
        assert_eq!(find_role("1"), Some(PROGRAMMING_EXPERT));
        assert_eq!(find_role(" 5 "), Some(CLI_ASSISTANT));
        assert_eq!(find_role("9"), None);
        assert_eq!(find_role(""), None);
    }

    #[test]
    fn test_keys_are_unique() {
        for (i, a) in ROLES.iter().enumerate() {
            for b in ROLES.iter().skip(i + 1) {
                assert_ne!(a.key, b.key);
            }
        }
    }

    #[test]
    fn test_only_cli_assistant_suggests_commands() {
        let suggesting: Vec<&str> = ROLES
            .iter()
            .filter(|role| role.suggests_commands())
            .map(|role| role.name)
            .collect();
        assert_eq!(suggesting, vec!["CLI Assistant"]);
    }

    #[test]
    fn test_cli_assistant_prompt_uses_sentinel() {
        assert!(CLI_ASSISTANT.system_prompt.contains(COMMAND_SENTINEL));
    }
}
