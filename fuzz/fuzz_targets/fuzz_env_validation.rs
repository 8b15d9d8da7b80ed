#![no_main]

use envschema::EnvMap;
use envschema::schema::declarative::{DeclarativeSchema, FieldKind, FieldRule};
use indexmap::IndexMap;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let mut fields = IndexMap::new();
    fields.insert("URL".to_string(), FieldRule::new(FieldKind::Url));
    fields.insert(
        "PORT".to_string(),
        FieldRule::new(FieldKind::Integer).between(Some(1.0), Some(65535.0)),
    );
    fields.insert("RATIO".to_string(), FieldRule::new(FieldKind::Number).optional());
    fields.insert(
        "DEBUG".to_string(),
        FieldRule::new(FieldKind::Boolean).with_default("false"),
    );
    fields.insert("TAGS".to_string(), FieldRule::new(FieldKind::List).optional());
    let Ok(schema) = DeclarativeSchema::new(fields) else {
        return;
    };

    let env: EnvMap = ["URL", "PORT", "RATIO", "DEBUG", "TAGS"]
        .iter()
        .zip(text.split('\n'))
        .map(|(k, v)| ((*k).to_string(), v.to_string()))
        .collect();
    let _ = schema.check(&env);
});
