//! Confirmation summary shown before submission.

use std::fmt;

use crate::project::{ProjectSubmission, Role};
use crate::security::{sanitize_html, sanitize_html_attribute};

pub const NO_DESCRIPTION: &str = "No description provided";

/// Post-sanitization values the user confirms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub name: String,
    pub description: String,
    pub groups: Vec<(String, Role)>,
}

impl From<&ProjectSubmission> for ProjectSummary {
    fn from(submission: &ProjectSubmission) -> Self {
        Self {
            name: submission.name.clone(),
            description: submission.description.clone(),
            groups: submission
                .user_groups
                .iter()
                .map(|g| (g.user_ids.clone(), g.role))
                .collect(),
        }
    }
}

impl ProjectSummary {
    /// Confirmation card markup. Every value is escaped for its context.
    pub fn render_html(&self) -> String {
        let description = if self.description.is_empty() {
            format!("<em>{}</em>", NO_DESCRIPTION)
        } else {
            sanitize_html(&self.description)
        };

        let mut html = String::new();
        html.push_str("<div class=\"summary-card\">\n");
        html.push_str("  <h3>Confirm Project Details</h3>\n");
        html.push_str(&format!(
            "  <div class=\"summary-section\"><span class=\"summary-label\">Project Name:</span><span class=\"summary-value\">{}</span></div>\n",
            sanitize_html(&self.name)
        ));
        html.push_str(&format!(
            "  <div class=\"summary-section\"><span class=\"summary-label\">Description:</span><span class=\"summary-value\">{}</span></div>\n",
            description
        ));
        html.push_str("  <div class=\"summary-section\"><span class=\"summary-label\">Users &amp; Roles:</span>\n");
        html.push_str("    <ul class=\"summary-users\">\n");
        for (user_ids, role) in &self.groups {
            html.push_str(&format!(
                "      <li class=\"summary-user-item\" data-role=\"{}\"><span class=\"summary-user-list\">{}</span><span class=\"summary-role\">Role: {}</span></li>\n",
                sanitize_html_attribute(role.as_str()),
                sanitize_html(user_ids),
                sanitize_html(role.label())
            ));
        }
        html.push_str("    </ul>\n  </div>\n</div>\n");
        html
    }
}

impl fmt::Display for ProjectSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Project Name: {}", self.name)?;
        if self.description.is_empty() {
            writeln!(f, "Description:  ({})", NO_DESCRIPTION)?;
        } else {
            writeln!(f, "Description:  {}", self.description)?;
        }
        writeln!(f, "Users & Roles:")?;
        for (user_ids, role) in &self.groups {
            writeln!(f, "  - {} (Role: {})", user_ids, role.label())?;
        }
        Ok(())
    }
}
