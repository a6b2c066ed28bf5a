//! Input validation for values that end up in REST paths.
//!
//! SObject names and record IDs are interpolated directly into URL paths, so
//! they are checked before any request is built.

/// SObject and field name validation.
pub mod soql {
    /// Validate that a field name is safe for use in SOQL.
    ///
    /// Field names must start with a letter and contain only alphanumerics
    /// and underscores.
    ///
    /// # Example
    ///
    /// ```rust
    /// use restforce_client::security::soql;
    ///
    /// assert!(soql::is_safe_field_name("Account"));
    /// assert!(soql::is_safe_field_name("Custom_Field__c"));
    /// assert!(!soql::is_safe_field_name("Bad'; DROP TABLE--"));
    /// ```
    #[must_use]
    pub fn is_safe_field_name(name: &str) -> bool {
        let mut chars = name.chars();

        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {}
            _ => return false,
        }

        chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    }

    /// Validate that a SObject name is safe.
    ///
    /// SObject names follow the same rules as field names.
    #[must_use]
    pub fn is_safe_sobject_name(name: &str) -> bool {
        is_safe_field_name(name)
    }
}

/// Record ID validation.
pub mod url {
    /// Validate that a Salesforce ID has the correct format.
    ///
    /// Salesforce IDs are either 15 or 18 characters and contain only
    /// alphanumeric characters.
    ///
    /// ```rust
    /// use restforce_client::security::url;
    ///
    /// assert!(url::is_valid_salesforce_id("001410000056Kf0AAE"));
    /// assert!(!url::is_valid_salesforce_id("001/../../etc"));
    /// ```
    #[must_use]
    pub fn is_valid_salesforce_id(id: &str) -> bool {
        let len = id.len();
        (len == 15 || len == 18) && id.chars().all(|c| c.is_ascii_alphanumeric())
    }
}
