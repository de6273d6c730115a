use fake::Fake;
use fake::faker::address::en::{CityName, CountryName, StateName, StreetName, ZipCode};
use fake::faker::company::en::{Buzzword, CompanyName, CompanySuffix, Industry};
use fake::faker::internet::en::{FreeEmail, SafeEmail, Username};
use fake::faker::job::en::Title as JobTitle;
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use rand::RngCore;

use demoforge_core::FakerField;

use super::{Evaluate, EvalContext};
use crate::errors::GenerationError;
use crate::record::FieldValue;

/// Named synthetic-text capability backed by the `fake` crate. Unknown
/// method names are a fatal capability error, not a null.
pub struct FakerEvaluator<'a> {
    pub params: &'a FakerField,
}

impl Evaluate for FakerEvaluator<'_> {
    fn evaluate(
        &self,
        _ctx: &mut EvalContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<FieldValue, GenerationError> {
        let value: String = match self.params.faker_method.as_str() {
            "name" => Name().fake_with_rng(rng),
            "first_name" => FirstName().fake_with_rng(rng),
            "last_name" => LastName().fake_with_rng(rng),
            "company" => CompanyName().fake_with_rng(rng),
            "company_suffix" => CompanySuffix().fake_with_rng(rng),
            "industry" => Industry().fake_with_rng(rng),
            "buzzword" => Buzzword().fake_with_rng(rng),
            "email" | "safe_email" => SafeEmail().fake_with_rng(rng),
            "free_email" => FreeEmail().fake_with_rng(rng),
            "user_name" => Username().fake_with_rng(rng),
            "job" => JobTitle().fake_with_rng(rng),
            "phone_number" => PhoneNumber().fake_with_rng(rng),
            "city" => CityName().fake_with_rng(rng),
            "country" => CountryName().fake_with_rng(rng),
            "state" => StateName().fake_with_rng(rng),
            "zipcode" | "postcode" => ZipCode().fake_with_rng(rng),
            "street_name" => StreetName().fake_with_rng(rng),
            unknown => return Err(GenerationError::UnknownFaker(unknown.to_string())),
        };
        Ok(FieldValue::Text(value))
    }
}
