use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Local, NaiveDate};
use serde::{Serialize, Serializer};

use crate::config::BookingLimits;
use crate::models::{BookingFormData, ExtraPerson};
use crate::services::dates;

pub mod messages {
    pub const REQUIRED_FIELD: &str = "This field is required";
    pub const INVALID_PHONE: &str = "Please enter a valid Taiwan mobile number";
    pub const INVALID_EMAIL: &str = "Please enter a valid email address";
    pub const INVALID_NAME: &str = "Name is required and must not be too long";
    pub const PHONE_EMAIL_REQUIRED: &str = "Please provide a phone number or an email";
    pub const SELECT_SERVICE: &str = "Please select a service";
    pub const SELECT_STAFF: &str = "Please select a staff member";
    pub const SELECT_DATE: &str = "Please select a date";
    pub const INVALID_DATE: &str = "Please enter a valid date";
    pub const DATE_IN_PAST: &str = "Please choose today or a later date";
    pub const SELECT_TIME_SLOT: &str = "Please select a time slot";
    pub const INVALID_PEOPLE: &str = "Number of people is out of range";
    pub const EXTRA_PERSONS_EXCEEDED: &str = "Too many extra persons, please remove some";
    pub const EXTRA_PERSONS_MISMATCH: &str = "Extra persons do not match the number of people";
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type ValidationResult = Result<(), ValidationError>;

/// A failed check tied to the form field it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ── Predicates ──

/// `09` followed by exactly eight ASCII digits.
pub fn is_valid_taiwan_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.starts_with("09") && phone.bytes().all(|b| b.is_ascii_digit())
}

/// `local@domain.tld`: a single `@`, no whitespace, and a dot in the domain with text on
/// both sides of it.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

pub fn is_valid_name_length(name: &str, max_len: usize) -> bool {
    let len = name.chars().count();
    len > 0 && len <= max_len
}

pub fn has_contact_info(phone: &str, email: &str) -> bool {
    !phone.trim().is_empty() || !email.trim().is_empty()
}

// ── Validators ──

/// Empty input passes; a required rule covers that case.
pub fn validate_taiwan_phone(value: &str) -> ValidationResult {
    if !value.is_empty() && !is_valid_taiwan_phone(value) {
        return Err(ValidationError::new(messages::INVALID_PHONE));
    }
    Ok(())
}

pub fn validate_email_format(value: &str) -> ValidationResult {
    if !value.is_empty() && !is_valid_email(value) {
        return Err(ValidationError::new(messages::INVALID_EMAIL));
    }
    Ok(())
}

/// Anything carrying a phone and an email.
pub trait ContactInfo {
    fn phone(&self) -> &str;
    fn email(&self) -> &str;
}

impl ContactInfo for ExtraPerson {
    fn phone(&self) -> &str {
        &self.phone
    }
    fn email(&self) -> &str {
        &self.email
    }
}

impl ContactInfo for BookingFormData {
    fn phone(&self) -> &str {
        &self.phone
    }
    fn email(&self) -> &str {
        &self.email
    }
}

/// Checks the shared form rather than the value handed in, so the phone field and the
/// email field report the same outcome whichever one was edited last.
pub fn create_phone_or_email_validator<T>(
    form: Arc<Mutex<T>>,
) -> impl Fn(&str) -> ValidationResult + Send + Sync
where
    T: ContactInfo + Send,
{
    move |_value: &str| {
        let form = form.lock().unwrap_or_else(PoisonError::into_inner);
        if has_contact_info(form.phone(), form.email()) {
            Ok(())
        } else {
            Err(ValidationError::new(messages::PHONE_EMAIL_REQUIRED))
        }
    }
}

// ── Rule descriptors ──

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    #[default]
    Blur,
    Change,
}

/// A named string matcher usable in a [`FieldRule`].
#[derive(Clone, Copy)]
pub struct Pattern {
    name: &'static str,
    matcher: fn(&str) -> bool,
}

impl Pattern {
    pub const TAIWAN_PHONE: Pattern = Pattern::new("taiwan-phone", is_valid_taiwan_phone);
    pub const EMAIL: Pattern = Pattern::new("email", is_valid_email);

    pub const fn new(name: &'static str, matcher: fn(&str) -> bool) -> Self {
        Self { name, matcher }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_match(&self, value: &str) -> bool {
        (self.matcher)(value)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.name).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRule {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
    pub message: String,
    pub trigger: Trigger,
}

impl FieldRule {
    pub fn check(&self, value: &str) -> ValidationResult {
        let failed = (self.required && value.is_empty())
            || self.max.is_some_and(|max| value.chars().count() > max)
            || self
                .pattern
                .is_some_and(|p| !value.is_empty() && !p.is_match(value));
        if failed {
            return Err(ValidationError::new(self.message.clone()));
        }
        Ok(())
    }
}

pub fn create_required_rule(message: Option<&str>, trigger: Option<Trigger>) -> FieldRule {
    FieldRule {
        required: true,
        max: None,
        pattern: None,
        message: message.unwrap_or(messages::REQUIRED_FIELD).to_string(),
        trigger: trigger.unwrap_or_default(),
    }
}

pub fn create_max_length_rule(max: usize, message: &str, trigger: Option<Trigger>) -> FieldRule {
    FieldRule {
        required: false,
        max: Some(max),
        pattern: None,
        message: message.to_string(),
        trigger: trigger.unwrap_or_default(),
    }
}

pub fn create_pattern_rule(pattern: Pattern, message: &str, trigger: Option<Trigger>) -> FieldRule {
    FieldRule {
        required: false,
        max: None,
        pattern: Some(pattern),
        message: message.to_string(),
        trigger: trigger.unwrap_or_default(),
    }
}

// ── Whole-form validation ──

/// Runs every check a booking must pass before it is submitted and returns all failures.
pub fn validate_booking_form(
    form: &BookingFormData,
    limits: &BookingLimits,
) -> Result<(), Vec<FieldError>> {
    validate_booking_form_at(form, limits, Local::now().date_naive())
}

/// As [`validate_booking_form`], with dates before `today` rejected.
pub fn validate_booking_form_at(
    form: &BookingFormData,
    limits: &BookingLimits,
    today: NaiveDate,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if form.service_id.is_none() {
        errors.push(FieldError::new("serviceId", messages::SELECT_SERVICE));
    }
    if form.selected_staff_id.is_none() {
        errors.push(FieldError::new("selectedStaffId", messages::SELECT_STAFF));
    }
    if form.date.is_empty() {
        errors.push(FieldError::new("date", messages::SELECT_DATE));
    } else {
        match dates::parse_date_input(&form.date) {
            None => errors.push(FieldError::new("date", messages::INVALID_DATE)),
            Some(parsed) if dates::is_date_before(parsed.local_date(), today) => {
                errors.push(FieldError::new("date", messages::DATE_IN_PAST));
            }
            Some(_) => {}
        }
    }
    if form.time_slot.is_empty() {
        errors.push(FieldError::new("timeSlot", messages::SELECT_TIME_SLOT));
    }

    check_person(
        "",
        &form.name,
        &form.phone,
        &form.email,
        limits.name_max_length,
        &mut errors,
    );

    if !(limits.min_people..=limits.max_people).contains(&form.total_people) {
        errors.push(FieldError::new("totalPeople", messages::INVALID_PEOPLE));
    }

    let extras = form.extra_persons.len();
    if extras > limits.max_extra_people {
        errors.push(FieldError::new("extraPersons", messages::EXTRA_PERSONS_EXCEEDED));
    } else if extras + 1 != form.total_people as usize {
        errors.push(FieldError::new("extraPersons", messages::EXTRA_PERSONS_MISMATCH));
    }

    for (i, person) in form.extra_persons.iter().enumerate() {
        check_person(
            &format!("extraPersons[{i}]."),
            &person.name,
            &person.phone,
            &person.email,
            limits.name_max_length,
            &mut errors,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_person(
    prefix: &str,
    name: &str,
    phone: &str,
    email: &str,
    name_max_length: usize,
    errors: &mut Vec<FieldError>,
) {
    if !is_valid_name_length(name, name_max_length) {
        errors.push(FieldError::new(format!("{prefix}name"), messages::INVALID_NAME));
    }
    if !has_contact_info(phone, email) {
        errors.push(FieldError::new(format!("{prefix}phone"), messages::PHONE_EMAIL_REQUIRED));
        return;
    }
    if let Err(e) = validate_taiwan_phone(phone) {
        errors.push(FieldError::new(format!("{prefix}phone"), e.message));
    }
    if let Err(e) = validate_email_format(email) {
        errors.push(FieldError::new(format!("{prefix}email"), e.message));
    }
}
