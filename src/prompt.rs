use crate::environment::Environment;

/// Instruction template sent to every provider. The model is told to emit
/// the bare command; the sanitizer still cleans up stray markdown.
const TEMPLATE: &str = "You are a CLI command generator. Your job is to translate natural language requests into shell commands.

RULES:
1. Output ONLY the command - no explanations, no markdown, no code blocks
2. Use the most common/standard tool for the job
3. Prefer safe, non-destructive operations when possible
4. For cloud commands (AWS, GCP, Azure), use the standard CLI tools
5. For Kubernetes, use kubectl
6. For Docker, use docker or docker-compose as appropriate
7. For Git, use standard git commands
8. Include helpful flags like --output table, -o wide, --format when they improve readability

CONTEXT:
- Operating System: {os}
- Shell: {shell}
- Current Directory: {cwd}
- AWS Profile (if set): {aws_profile}
- Kubernetes Context (if set): {k8s_context}

USER REQUEST: {request}

OUTPUT: Just the command, nothing else.";

/// Render the instruction template with environment facts and the request
pub fn build_prompt(request: &str, env: &Environment) -> String {
    TEMPLATE
        .replace("{os}", env.os.as_str())
        .replace("{shell}", &env.shell)
        .replace("{cwd}", &env.cwd)
        .replace("{aws_profile}", env.aws_profile.as_deref().unwrap_or("not set"))
        .replace("{k8s_context}", env.k8s_context.as_deref().unwrap_or("not set"))
        .replace("{request}", request)
}
