//! Built-in message bundles.

/// Locale served by [`ValidatorFactory::create`](crate::ValidatorFactory::create)
/// when nothing else is asked for.
pub const DEFAULT_LOCALE: &str = "en";

const EN: &[(&str, &str)] = &[
    ("accepted", "The :attribute must be accepted."),
    ("alphanum", "The :attribute must contain only letters and numbers."),
    ("alpha", "The :attribute must contain only letters."),
    ("array", "The :attribute must be an array."),
    ("between", "The :attribute must be between :min and :max."),
    ("birthday", "The :attribute is not valid."),
    ("boolean", "The :attribute must be a boolean."),
    ("dateafter", "The :attribute must be after :limit."),
    ("datebefore", "The :attribute must be before :limit."),
    ("datebetween", "The :attribute must be between :after and :before."),
    ("dateformat", "The :attribute must respect the format :format."),
    ("date", "The :attribute must be a date."),
    ("different", "The :attribute must have a different value from :other."),
    ("email", "The :attribute must be an email."),
    ("equals", "The :attribute must have the same value as :other."),
    ("extension", "The :attribute extension must be in :extensions."),
    ("file", "The :attribute must be a file."),
    ("havedifferent", "All the :attribute must have a different value for :field."),
    ("havesame", "All the :attribute must have the same value as :field."),
    ("in", "The :attribute must be in :set."),
    ("integer", "The :attribute must be an integer."),
    ("ip", "The :attribute must be an ip address."),
    ("max", "The :attribute must be lesser than :max."),
    ("mimetype", "The :attribute mime type must be in :mimetypes."),
    ("min", "The :attribute must be greater than :min."),
    ("notaccepted", "The :attribute must not be accepted."),
    ("notblank", "The :attribute must not be blank."),
    ("notin", "The :attribute must not be in :set."),
    ("numeric", "The :attribute must be numeric."),
    ("present", "The :attribute must be present."),
    ("regex", "The :attribute format is invalid."),
    ("required", "The :attribute is required."),
    ("size", "The :attribute size must be lesser than :sizeKB."),
    ("slug", "The :attribute must contain only letters, numbers, dashes and underscores."),
    ("urlactive", "The :attribute must be an active url."),
    ("url", "The :attribute must be an url."),
];

/// Returns the built-in templates of `locale`, keyed by rule name.
pub fn templates(locale: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match locale {
        "en" => Some(EN),
        _ => None,
    }
}

/// Locales with a built-in bundle.
pub fn available() -> &'static [&'static str] {
    &["en"]
}
