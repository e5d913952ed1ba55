use regex::{Captures, Regex};
use std::collections::BTreeMap;

use crate::error::{DeployError, Result};

fn placeholder_regex() -> Result<Regex> {
    Regex::new(r"\{([a-z_]+)\}").map_err(|e| DeployError::template(e.to_string()))
}

/// Command string with `{name}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate(String);

impl CommandTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        CommandTemplate(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Placeholder names referenced by this template, in order of appearance
    pub fn placeholders(&self) -> Result<Vec<String>> {
        Ok(placeholder_regex()?
            .captures_iter(&self.0)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
            .collect())
    }

    /// Substitutes every placeholder from `context`.
    ///
    /// Text outside placeholders, including shell variables like `$GOPATH`,
    /// is left untouched.
    ///
    /// # Returns
    /// * `Ok(String)` - The rendered command
    /// * `Err(Template)` - If a placeholder has no value in `context`
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let re = placeholder_regex()?;

        if let Some(missing) = self
            .placeholders()?
            .into_iter()
            .find(|name| !context.contains(name))
        {
            return Err(DeployError::template(format!(
                "unknown placeholder '{{{}}}' in '{}'",
                missing, self.0
            )));
        }

        let rendered = re.replace_all(&self.0, |caps: &Captures| {
            context.get(&caps[1]).unwrap_or_default().to_string()
        });
        Ok(rendered.into_owned())
    }
}

/// Values available to command templates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateContext {
    values: BTreeMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_placeholders() {
        let ctx = TemplateContext::new()
            .with("branch", "master")
            .with("archive_path", "/tmp/solebtc.tar");
        let template =
            CommandTemplate::new("git archive --format=tar --output={archive_path} {branch}");

        assert_eq!(
            template.render(&ctx).unwrap(),
            "git archive --format=tar --output=/tmp/solebtc.tar master"
        );
    }

    #[test]
    fn test_render_leaves_shell_variables() {
        let ctx = TemplateContext::new().with("service", "solebtc");
        let template = CommandTemplate::new("cd $GOPATH/src && supervisorctl restart {service}");

        assert_eq!(
            template.render(&ctx).unwrap(),
            "cd $GOPATH/src && supervisorctl restart solebtc"
        );
    }

    #[test]
    fn test_render_unknown_placeholder() {
        let template = CommandTemplate::new("echo {nope}");
        let err = template.render(&TemplateContext::new()).unwrap_err();
        assert!(err.to_string().contains("{nope}"));
    }

    #[test]
    fn test_render_repeated_placeholder() {
        let ctx = TemplateContext::new().with("dir", "/srv/app");
        let template = CommandTemplate::new("rm -rf {dir} && mkdir -p {dir}");
        assert_eq!(
            template.render(&ctx).unwrap(),
            "rm -rf /srv/app && mkdir -p /srv/app"
        );
    }

    #[test]
    fn test_placeholders_in_order() {
        let template = CommandTemplate::new("{a} {b} {a}");
        assert_eq!(template.placeholders().unwrap(), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_value_containing_braces_is_not_reexpanded() {
        let ctx = TemplateContext::new().with("branch", "{branch}");
        let template = CommandTemplate::new("echo {branch}");
        assert_eq!(template.render(&ctx).unwrap(), "echo {branch}");
    }
}
