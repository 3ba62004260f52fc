/// Upload form state
///
/// Accumulates the fields of a new photo: title, caption, location, an
/// ordered set of person names and the image to send.
use thiserror::Error;

use crate::media::SelectedImage;

/// Maximum title length in characters
pub const TITLE_MAX_CHARS: usize = 200;
/// Maximum caption length in characters
pub const CAPTION_MAX_CHARS: usize = 1000;
/// Maximum location length in characters
pub const LOCATION_MAX_CHARS: usize = 100;

/// Local validation failures, reported before any network call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadValidationError {
    #[error("Please select an image")]
    MissingImage,
    #[error("Please enter a title")]
    MissingTitle,
}

/// Everything `POST /photos/upload` needs
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub title: String,
    pub caption: String,
    pub location: String,
    pub people: Vec<String>,
    pub image: SelectedImage,
}

/// Cut `value` down to at most `max` characters
pub fn limit_chars(value: String, max: usize) -> String {
    if value.chars().count() <= max {
        value
    } else {
        value.chars().take(max).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    title: String,
    caption: String,
    location: String,
    /// Unique names, in the order they were added
    people: Vec<String>,
    /// Pending text of the "add person" field
    person_input: String,
    image: Option<SelectedImage>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn people(&self) -> &[String] {
        &self.people
    }

    pub fn person_input(&self) -> &str {
        &self.person_input
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn set_title(&mut self, title: String) {
        self.title = limit_chars(title, TITLE_MAX_CHARS);
    }

    pub fn set_caption(&mut self, caption: String) {
        self.caption = limit_chars(caption, CAPTION_MAX_CHARS);
    }

    pub fn set_location(&mut self, location: String) {
        self.location = limit_chars(location, LOCATION_MAX_CHARS);
    }

    pub fn set_person_input(&mut self, input: String) {
        self.person_input = input;
    }

    pub fn set_image(&mut self, image: SelectedImage) {
        self.image = Some(image);
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    /// Add a person by name.
    ///
    /// The name is trimmed first. Empty names and names already in the list
    /// (exact, case-sensitive match) are ignored. Returns true if the name
    /// was appended.
    pub fn add_person(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.people.iter().any(|p| p == name) {
            return false;
        }
        self.people.push(name.to_string());
        true
    }

    /// Add whatever is typed in the person field; the field is cleared only
    /// when the name was accepted
    pub fn commit_person_input(&mut self) -> bool {
        let input = std::mem::take(&mut self.person_input);
        let added = self.add_person(&input);
        if !added {
            self.person_input = input;
        }
        added
    }

    pub fn remove_person(&mut self, name: &str) {
        self.people.retain(|p| p != name);
    }

    /// Check the form and build the upload payload
    pub fn to_request(&self) -> Result<UploadRequest, UploadValidationError> {
        let image = self.image.clone().ok_or(UploadValidationError::MissingImage)?;

        if self.title.trim().is_empty() {
            return Err(UploadValidationError::MissingTitle);
        }

        Ok(UploadRequest {
            title: self.title.clone(),
            caption: self.caption.clone(),
            location: self.location.clone(),
            people: self.people.clone(),
            image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image() -> SelectedImage {
        SelectedImage {
            file_name: "beach.png".to_string(),
            mime: "image/png",
            bytes: vec![0x89, b'P', b'N', b'G'],
            preview: None,
        }
    }

    #[test]
    fn test_add_person_appends_in_order() {
        let mut form = UploadForm::new();
        assert!(form.add_person("Ana"));
        assert!(form.add_person("  Ben "));
        assert_eq!(form.people(), ["Ana".to_string(), "Ben".to_string()]);
    }

    #[test]
    fn test_add_person_ignores_duplicates_after_trim() {
        let mut form = UploadForm::new();
        form.add_person("Ana");
        form.add_person("Ben");

        assert!(!form.add_person("  Ana  "));
        assert_eq!(form.people(), ["Ana".to_string(), "Ben".to_string()]);
    }

    #[test]
    fn test_add_person_is_case_sensitive() {
        let mut form = UploadForm::new();
        form.add_person("ana");
        assert!(form.add_person("Ana"));
        assert_eq!(form.people().len(), 2);
    }

    #[test]
    fn test_add_person_ignores_blank() {
        let mut form = UploadForm::new();
        assert!(!form.add_person(""));
        assert!(!form.add_person("   \t"));
        assert!(form.people().is_empty());
    }

    #[test]
    fn test_commit_person_input_clears_only_on_success() {
        let mut form = UploadForm::new();
        form.set_person_input("Ana".to_string());
        assert!(form.commit_person_input());
        assert_eq!(form.person_input(), "");

        form.set_person_input("Ana".to_string());
        assert!(!form.commit_person_input());
        assert_eq!(form.person_input(), "Ana");
    }

    #[test]
    fn test_remove_person_keeps_order_of_the_rest() {
        let mut form = UploadForm::new();
        for name in ["Ana", "Ben", "Cleo"] {
            form.add_person(name);
        }
        form.remove_person("Ben");
        assert_eq!(form.people(), ["Ana".to_string(), "Cleo".to_string()]);
    }

    #[test]
    fn test_missing_image_fails_before_title_check() {
        let form = UploadForm::new();
        let err = form.to_request().unwrap_err();
        assert_eq!(err, UploadValidationError::MissingImage);
        assert_eq!(err.to_string(), "Please select an image");
    }

    #[test]
    fn test_missing_title() {
        let mut form = UploadForm::new();
        form.set_image(sample_image());
        form.set_title("   ".to_string());
        assert_eq!(form.to_request().unwrap_err(), UploadValidationError::MissingTitle);
    }

    #[test]
    fn test_complete_form_builds_request() {
        let mut form = UploadForm::new();
        form.set_image(sample_image());
        form.set_title("Harbour".to_string());
        form.set_location("Lisbon".to_string());
        form.add_person("Ana");

        let request = form.to_request().unwrap();
        assert_eq!(request.title, "Harbour");
        assert_eq!(request.location, "Lisbon");
        assert_eq!(request.people, vec!["Ana".to_string()]);
        assert_eq!(request.image.file_name, "beach.png");
    }

    #[test]
    fn test_field_lengths_are_capped() {
        let mut form = UploadForm::new();
        form.set_title("x".repeat(TITLE_MAX_CHARS + 20));
        form.set_location("é".repeat(LOCATION_MAX_CHARS + 1));
        assert_eq!(form.title().chars().count(), TITLE_MAX_CHARS);
        assert_eq!(form.location().chars().count(), LOCATION_MAX_CHARS);
    }
}
