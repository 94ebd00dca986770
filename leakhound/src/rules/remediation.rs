//! Remediation guidance attached to findings.

/// Returns remediation steps for a finding: the base rotation checklist
/// plus provider-specific steps where we have them.
#[must_use]
pub fn remediation_steps(provider: &str) -> Vec<String> {
    let mut steps: Vec<String> = [
        "1. Immediately revoke/rotate the exposed credential",
        "2. Remove the secret from source code",
        "3. Use environment variables or a secrets manager",
        "4. Update .gitignore to prevent future commits",
        "5. If committed to git, clean history with BFG or git filter-branch",
    ]
    .iter()
    .map(|s| (*s).to_owned())
    .collect();

    let provider_specific: Option<&[&str]> = match provider {
        "AWS" => Some(&[
            "AWS Console: IAM > Users > Security Credentials > Deactivate/Delete",
            "Create new access key and update applications",
            "Review CloudTrail logs for unauthorized access",
            "Consider using IAM roles instead of access keys",
        ]),
        "GitHub" => Some(&[
            "GitHub: Settings > Developer settings > Personal access tokens > Revoke",
            "Generate new token with minimal required scopes",
            "Review repository access and audit logs",
        ]),
        "Stripe" => Some(&[
            "Stripe Dashboard: Developers > API keys > Roll key",
            "Update all applications using this key",
            "Review Stripe logs for suspicious activity",
        ]),
        "Slack" => Some(&[
            "Slack: App settings > OAuth & Permissions > Regenerate token",
            "Review bot activity and workspace access logs",
        ]),
        "OpenAI" => Some(&[
            "OpenAI: API keys > Delete and create new key",
            "Review usage logs for unexpected API calls",
            "Set up usage limits and alerts",
        ]),
        _ => None,
    };

    if let Some(extra) = provider_specific {
        steps.push("Provider-specific steps:".to_owned());
        steps.extend(extra.iter().map(|s| (*s).to_owned()));
    }

    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_steps_always_present() {
        let steps = remediation_steps("Unknown");
        assert_eq!(steps.len(), 5);
        assert!(steps[0].contains("revoke/rotate"));
    }

    #[test]
    fn provider_steps_appended_for_known_providers() {
        let steps = remediation_steps("AWS");
        assert!(steps.len() > 5);
        assert!(steps.iter().any(|s| s.contains("CloudTrail")));
    }
}
