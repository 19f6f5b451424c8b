use crate::schema::WebUiSettings;

pub(super) fn validate_content(errors: &mut Vec<String>, settings: &WebUiSettings) {
    let content = &settings.content;
    if !content.url.trim().is_empty() && !content.html.is_empty() {
        errors.push("content.url and content.html are mutually exclusive".into());
    }
}
