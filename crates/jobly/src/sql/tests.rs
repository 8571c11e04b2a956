use super::*;
use crate::value::Value;

const PEOPLE: AliasMap<'static> = AliasMap::new(&[("firstName", "first_name")]);

// ==================== partial update ====================

#[test]
fn partial_update_aliases_and_numbers_fields() {
    let payload = UpdatePayload::new().set("firstName", "Aliya").set("age", 32);
    let frag = sql_for_partial_update(payload, &PEOPLE).unwrap();

    assert_eq!(frag.fragment, r#""first_name"=$1, "age"=$2"#);
    assert_eq!(frag.values, vec![Value::from("Aliya"), Value::Int(32)]);
    assert_eq!(frag.next_placeholder(), 3);
}

#[test]
fn partial_update_empty_payload_is_rejected() {
    for aliases in [PEOPLE, AliasMap::empty()] {
        let err = sql_for_partial_update(UpdatePayload::new(), &aliases).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.http_status(), 400);
    }
}

#[test]
fn partial_update_unaliased_key_uses_raw_name() {
    let payload = UpdatePayload::new().set("description", "New");
    let frag = sql_for_partial_update(payload, &AliasMap::empty()).unwrap();
    assert_eq!(frag.fragment, r#""description"=$1"#);
}

#[test]
fn partial_update_placeholder_count_matches_values() {
    let payload: UpdatePayload = [
        ("title", Value::from("new")),
        ("salary", Value::Null),
        ("equity", Value::from("0.5")),
        ("companyHandle", Value::from("c1")),
    ]
    .into_iter()
    .collect();
    let aliases = AliasMap::new(&[("companyHandle", "company_handle")]);
    let frag = sql_for_partial_update(payload, &aliases).unwrap();

    assert_eq!(
        frag.fragment,
        r#""title"=$1, "salary"=$2, "equity"=$3, "company_handle"=$4"#
    );
    assert_eq!(frag.values.len(), 4);
    assert_eq!(frag.values[1], Value::Null);
    assert_eq!(frag.params_ref().len(), 4);
}

#[test]
fn partial_update_repeated_key_keeps_first_position() {
    let payload = UpdatePayload::new()
        .set("name", "a")
        .set("age", 1)
        .set("name", "b");
    let frag = sql_for_partial_update(payload, &AliasMap::empty()).unwrap();
    assert_eq!(frag.fragment, r#""name"=$1, "age"=$2"#);
    assert_eq!(frag.values, vec![Value::from("b"), Value::Int(1)]);
}

#[test]
fn partial_update_payload_from_json_keeps_key_order() {
    let body = serde_json::json!({ "zeta": 1, "alpha": "x", "numEmployees": 10 });
    let payload = UpdatePayload::try_from(body).unwrap();
    let aliases = AliasMap::new(&[("numEmployees", "num_employees")]);
    let frag = sql_for_partial_update(payload, &aliases).unwrap();
    assert_eq!(frag.fragment, r#""zeta"=$1, "alpha"=$2, "num_employees"=$3"#);
}

#[test]
fn partial_update_payload_rejects_nested_values() {
    let body = serde_json::json!({ "logoUrl": { "href": "x" } });
    assert!(UpdatePayload::try_from(body).is_err());
    assert!(UpdatePayload::try_from(serde_json::json!([1])).is_err());
}

#[test]
fn partial_update_payload_deserializes() {
    let payload: UpdatePayload = serde_json::from_str(r#"{"title":"j1-new","salary":null}"#).unwrap();
    assert_eq!(payload.keys().collect::<Vec<_>>(), vec!["title", "salary"]);
    assert_eq!(payload.get("salary"), Some(&Value::Null));
}

// ==================== company filter ====================

#[test]
fn company_filter_name_only() {
    let frag = sql_for_company_filter(CompanyFilter {
        name: Some("c1".into()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(frag.fragment, r#"LOWER("name") LIKE LOWER($1)"#);
    assert_eq!(frag.values, vec![Value::from("%c1%")]);
}

#[test]
fn company_filter_max_only_uses_zero_lower_bound() {
    let frag = sql_for_company_filter(CompanyFilter {
        max_employees: Some(2),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(frag.fragment, r#""num_employees" BETWEEN 0 AND $1"#);
    assert_eq!(frag.values, vec![Value::Int(2)]);
}

#[test]
fn company_filter_min_only_has_no_between() {
    let frag = sql_for_company_filter(CompanyFilter {
        min_employees: Some(2),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(frag.fragment, r#""num_employees" >= $1"#);
    assert!(!frag.fragment.contains("BETWEEN"));
    assert_eq!(frag.values, vec![Value::Int(2)]);
}

#[test]
fn company_filter_both_bounds_bind_upper_first() {
    let frag = sql_for_company_filter(CompanyFilter {
        min_employees: Some(1),
        max_employees: Some(3),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(frag.fragment, r#""num_employees" BETWEEN $2 AND $1"#);
    assert_eq!(frag.values, vec![Value::Int(3), Value::Int(1)]);
}

#[test]
fn company_filter_all_fields_are_comma_joined() {
    let frag = sql_for_company_filter(CompanyFilter {
        name: Some("net".into()),
        min_employees: Some(10),
        max_employees: Some(500),
    })
    .unwrap();
    assert_eq!(
        frag.fragment,
        r#"LOWER("name") LIKE LOWER($1), "num_employees" BETWEEN $3 AND $2"#
    );
    assert_eq!(
        frag.values,
        vec![Value::from("%net%"), Value::Int(500), Value::Int(10)]
    );
}

#[test]
fn company_filter_inverted_range_is_rejected() {
    for (min, max) in [(2, 1), (100, 0), (0, -1)] {
        let err = sql_for_company_filter(CompanyFilter {
            name: Some("c".into()),
            min_employees: Some(min),
            max_employees: Some(max),
        })
        .unwrap_err();
        assert!(err.is_validation());
    }
}

#[test]
fn company_filter_equal_bounds_are_allowed() {
    let frag = sql_for_company_filter(CompanyFilter {
        min_employees: Some(5),
        max_employees: Some(5),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(frag.values, vec![Value::Int(5), Value::Int(5)]);
}

#[test]
fn company_filter_empty_emits_nothing() {
    let filter = CompanyFilter::default();
    assert!(filter.is_empty());
    let frag = sql_for_company_filter(filter).unwrap();
    assert!(frag.is_empty());
    assert!(frag.values.is_empty());
}

#[test]
fn company_filter_deserializes_camel_case() {
    let filter: CompanyFilter =
        serde_json::from_str(r#"{"name":"c","minEmployees":1,"extra":true}"#).unwrap();
    assert_eq!(filter.name.as_deref(), Some("c"));
    assert_eq!(filter.min_employees, Some(1));
    assert_eq!(filter.max_employees, None);
}

#[test]
fn company_filter_name_and_max_only() {
    let frag = sql_for_company_filter(CompanyFilter {
        name: Some("net".into()),
        max_employees: Some(50),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(
        frag.fragment,
        r#"LOWER("name") LIKE LOWER($1), "num_employees" BETWEEN 0 AND $2"#
    );
    assert_eq!(frag.values, vec![Value::from("%net%"), Value::Int(50)]);
}

#[test]
fn company_filter_name_and_min_only() {
    let frag = sql_for_company_filter(CompanyFilter {
        name: Some("net".into()),
        min_employees: Some(7),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(
        frag.fragment,
        r#"LOWER("name") LIKE LOWER($1), "num_employees" >= $2"#
    );
    assert_eq!(frag.values, vec![Value::from("%net%"), Value::Int(7)]);
}

#[test]
fn company_filter_accepts_query_string_numbers() {
    let filter: CompanyFilter =
        serde_json::from_str(r#"{"minEmployees":"2","maxEmployees":3}"#).unwrap();
    assert_eq!(filter.min_employees, Some(2));
    assert_eq!(filter.max_employees, Some(3));

    let err = serde_json::from_str::<CompanyFilter>(r#"{"minEmployees":"many"}"#).unwrap_err();
    assert!(err.to_string().contains("expected an integer"));
}

// ==================== job filter ====================

#[test]
fn job_filter_title_only() {
    let frag = sql_for_job_filter(JobFilter {
        title: Some("j2".into()),
        ..Default::default()
    });
    assert_eq!(frag.fragment, r#"LOWER("title") LIKE LOWER($1)"#);
    assert_eq!(frag.values, vec![Value::from("%j2%")]);
}

#[test]
fn job_filter_min_salary_only() {
    let frag = sql_for_job_filter(JobFilter {
        min_salary: Some(40000),
        ..Default::default()
    });
    assert_eq!(frag.fragment, r#""salary" >= $1"#);
    assert_eq!(frag.values, vec![Value::Int(40000)]);
}

#[test]
fn job_filter_has_equity_binds_nothing() {
    let frag = sql_for_job_filter(JobFilter {
        has_equity: Some(true),
        ..Default::default()
    });
    assert_eq!(frag.fragment, r#""equity" > 0"#);
    assert!(frag.values.is_empty());
}

#[test]
fn job_filter_has_equity_false_is_dropped() {
    let frag = sql_for_job_filter(JobFilter {
        min_salary: Some(10),
        has_equity: Some(false),
        ..Default::default()
    });
    assert_eq!(frag.fragment, r#""salary" >= $1"#);
    assert_eq!(frag.values, vec![Value::Int(10)]);
}

#[test]
fn job_filter_values_keep_field_order() {
    let frag = sql_for_job_filter(JobFilter {
        title: Some("2".into()),
        min_salary: Some(40000),
        has_equity: Some(true),
    });
    assert_eq!(
        frag.fragment,
        r#"LOWER("title") LIKE LOWER($1), "salary" >= $2, "equity" > 0"#
    );
    assert_eq!(frag.values, vec![Value::from("%2%"), Value::Int(40000)]);
}

#[test]
fn job_filter_accepts_query_string_values() {
    let filter: JobFilter =
        serde_json::from_str(r#"{"title":"j","minSalary":"40000","hasEquity":"true"}"#).unwrap();
    assert_eq!(filter.min_salary, Some(40000));
    assert_eq!(filter.has_equity, Some(true));

    let filter: JobFilter = serde_json::from_str(r#"{"hasEquity":false}"#).unwrap();
    assert_eq!(filter.has_equity, Some(false));
    assert_eq!(filter.min_salary, None);

    assert!(serde_json::from_str::<JobFilter>(r#"{"hasEquity":"maybe"}"#).is_err());
}
