use regex::RegexBuilder;

/// Heuristic patterns for destructive or irreversible commands.
///
/// Each entry is tried both as a case-insensitive literal substring and as a
/// regex fragment. This is a best-effort warning list, not a safety
/// guarantee: the bare "-f " entry in particular trades false positives for
/// catching force flags in unfamiliar tools.
pub const DANGEROUS_PATTERNS: &[&str] = &[
    // Destructive file operations
    "rm -rf",
    "rm -r",
    "rmdir",
    "del /s",
    // Database operations
    "DROP TABLE",
    "DROP DATABASE",
    "DELETE FROM",
    "TRUNCATE",
    // Cloud destructive operations
    "aws .* delete",
    "aws .* terminate",
    "aws .* remove",
    "kubectl delete",
    "docker rm",
    "docker rmi",
    "docker system prune",
    "docker volume rm",
    // Force flags in dangerous contexts
    "--force",
    "-f ", // trailing space to limit false positives
    // Privilege escalation
    "sudo rm",
    "sudo dd",
    "chmod 777",
    "chown -R",
    // Git destructive
    "git reset --hard",
    "git push --force",
    "git clean -fd",
];

/// Check whether a command matches any known dangerous pattern.
///
/// A single match is enough; there is no scoring. A pattern that fails to
/// compile as a regex is skipped rather than aborting the scan.
pub fn is_dangerous_command(command: &str) -> bool {
    DANGEROUS_PATTERNS
        .iter()
        .any(|pattern| matches_pattern(command, pattern))
}

/// Test one pattern as a literal substring, then as a regex. A pattern that
/// does not compile is treated as a non-match.
fn matches_pattern(command: &str, pattern: &str) -> bool {
    if command.to_lowercase().contains(&pattern.to_lowercase()) {
        return true;
    }

    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => re.is_match(command),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rm_rf_is_dangerous() {
        assert!(is_dangerous_command("rm -rf /tmp/test"));
    }

    #[test]
    fn test_kubectl_delete_is_dangerous() {
        assert!(is_dangerous_command("kubectl delete pod nginx"));
    }

    #[test]
    fn test_docker_rm_is_dangerous() {
        assert!(is_dangerous_command("docker rm -f container123"));
    }

    #[test]
    fn test_git_force_push_is_dangerous() {
        assert!(is_dangerous_command("git push --force origin main"));
    }

    #[test]
    fn test_drop_table_is_dangerous() {
        assert!(is_dangerous_command("psql -c 'DROP TABLE users'"));
    }

    #[test]
    fn test_aws_delete_matched_as_regex() {
        // Only the regex form catches this: "aws .* delete" is no substring
        assert!(is_dangerous_command("aws ec2 delete-security-group --group-id sg-1"));
        assert!(is_dangerous_command("aws ec2 terminate-instances --instance-ids i-1"));
    }

    #[test]
    fn test_case_insensitive_matching() {
        assert!(is_dangerous_command("RM -RF /var/log"));
        assert!(is_dangerous_command("drop table accounts;"));
    }

    #[test]
    fn test_ls_is_not_dangerous() {
        assert!(!is_dangerous_command("ls -la"));
    }

    #[test]
    fn test_kubectl_get_is_not_dangerous() {
        assert!(!is_dangerous_command("kubectl get pods"));
    }

    #[test]
    fn test_docker_ps_is_not_dangerous() {
        assert!(!is_dangerous_command("docker ps"));
    }

    #[test]
    fn test_aws_list_is_not_dangerous() {
        assert!(!is_dangerous_command("aws s3 ls"));
    }

    #[test]
    fn test_bare_force_flag_known_false_positive() {
        // Acknowledged heuristic weakness: "-f " flags anything, including
        // harmless tail -f usage
        assert!(is_dangerous_command("tail -f /var/log/syslog"));
    }

    #[test]
    fn test_malformed_regex_is_ignored() {
        // An unclosed group never compiles; the scan must not panic and the
        // literal fallback must still work
        assert!(!matches_pattern("ls -la", "rm (-rf"));
        assert!(matches_pattern("echo 'rm (-rf'", "rm (-rf"));
    }

    #[test]
    fn test_trailing_force_flag_without_space_not_matched_by_substring() {
        // "-f" at end of string has no trailing space; grep -i alone is fine
        assert!(!is_dangerous_command("grep -i error app.log"));
    }
}
