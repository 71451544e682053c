use formui::prelude::*;
use regex::Regex;

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> AppResult<()> {
    let fields = vec![
        FieldSpec::text("email", "Email"),
        FieldSpec::text("nickname", "Nickname"),
        FieldSpec::secret("password", "Password"),
        FieldSpec::bool("subscribed", "Subscribe to the newsletter"),
    ];

    let email = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")?;
    let validations = ValidationRegistry::new()
        .rule("email", {
            let non_empty = validators::required();
            let by_pattern = validators::pattern(email, "must look like an email address");
            move |value: &serde_json::Value| match non_empty(value) {
                ValidationOutcome::Valid => by_pattern(value),
                invalid => invalid,
            }
        })
        .rule("password", validators::min_length(8));

    let submitted = FormUi::new(fields)
        .with_title("Sign up")
        .with_validations(validations)
        .run()?;

    match submitted {
        Some(values) => println!("{}", serde_json::to_string_pretty(&values)?),
        None => println!("cancelled"),
    }
    Ok(())
}
