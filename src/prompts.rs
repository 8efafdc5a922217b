//! Static prompt templates

use serde_json::{json, Map, Value};

pub struct PromptTemplate {
    pub name: &'static str,
    pub description: &'static str,
    /// (argument name, description)
    pub arguments: &'static [(&'static str, &'static str)],
    pub template: &'static str,
}

pub const PROMPTS: &[PromptTemplate] = &[
    PromptTemplate {
        name: "newsletter_summary",
        description: "Create a summary of a Substack newsletter.",
        arguments: &[("newsletter_url", "URL of the Substack newsletter")],
        template: "I need to create a summary of the Substack newsletter at {newsletter_url}.\n\
                   Please gather the most recent posts, identify main themes, and create a concise summary.",
    },
    PromptTemplate {
        name: "cross_substack_research",
        description: "Research a topic across multiple Substack newsletters.",
        arguments: &[("topic", "The topic to research")],
        template: "I want to research {topic} across multiple Substack newsletters.\n\
                   Please search across relevant newsletters, compare the perspectives you find, \
                   and summarize the key arguments with links to the original posts.",
    },
];

pub fn find(name: &str) -> Option<&'static PromptTemplate> {
    PROMPTS.iter().find(|p| p.name == name)
}

impl PromptTemplate {
    /// Fill `{placeholder}` slots from `args`; slots without a string value stay as-is
    pub fn render(&self, args: &Map<String, Value>) -> String {
        let mut text = self.template.to_string();
        for (name, _) in self.arguments {
            if let Some(value) = args.get(*name).and_then(Value::as_str) {
                text = text.replace(&format!("{{{}}}", name), value);
            }
        }
        text
    }

    /// Entry for `prompts/list`
    pub fn descriptor(&self) -> Value {
        let arguments: Vec<Value> = self
            .arguments
            .iter()
            .map(|(name, description)| {
                json!({ "name": name, "description": description, "required": false })
            })
            .collect();
        json!({
            "name": self.name,
            "description": self.description,
            "arguments": arguments,
        })
    }
}
