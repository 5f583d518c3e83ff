use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

const RESULT_FIELDS: &str = r#"{"merchant_id":1001,"product_name":"Widget",
    "total_price_in_cents":1999,"variable_symbol":"VS42",
    "result":"CALL_COMPLETED","session_state":"WAITING"}"#;

fn gopay() -> Command {
    let mut cmd = Command::new(cargo_bin!());
    cmd.args(["--config", "tests/fixtures/merchant.toml"]);
    cmd
}

#[test]
fn test_sign_batch_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = gopay();
    cmd.args(["sign-batch", "tests/fixtures/payments.csv"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "variable_symbol,product_name,total_price,encrypted_signature",
        ))
        .stdout(predicate::str::contains("VS42,Widget,1999,"))
        .stdout(predicate::str::contains("VS43,Gadget,500,"))
        .stdout(predicate::str::contains("VS44").not())
        .stderr(predicate::str::contains("Error reading payment"));

    Ok(())
}

#[test]
fn test_simulate_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = gopay();
    cmd.args(["simulate", "tests/fixtures/payments.csv"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("variable_symbol,state"))
        .stdout(predicate::str::contains("VS42,confirmed"))
        .stdout(predicate::str::contains("VS43,confirmed"));

    Ok(())
}

#[test]
fn test_sign_then_verify() -> Result<(), Box<dyn std::error::Error>> {
    let output = gopay()
        .args(["sign", "--kind", "payment-result", "--fields", RESULT_FIELDS])
        .output()?;
    assert!(output.status.success());
    let signature = String::from_utf8(output.stdout)?.trim().to_string();
    assert!(!signature.is_empty());

    gopay()
        .args(["verify", "--kind", "payment-result", "--fields", RESULT_FIELDS])
        .args(["--signature", &signature])
        .assert()
        .success()
        .stdout(predicate::str::contains("authentic"));

    Ok(())
}

#[test]
fn test_verify_rejects_altered_message() -> Result<(), Box<dyn std::error::Error>> {
    let output = gopay()
        .args(["sign", "--kind", "payment-result", "--fields", RESULT_FIELDS])
        .output()?;
    let signature = String::from_utf8(output.stdout)?.trim().to_string();
    let altered = RESULT_FIELDS.replace("1999", "2000");

    gopay()
        .args(["verify", "--kind", "payment-result", "--fields", &altered])
        .args(["--signature", &signature])
        .assert()
        .failure()
        .stdout(predicate::str::contains("authentic").not());

    Ok(())
}

#[test]
fn test_unknown_field_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    gopay()
        .args(["sign", "--kind", "buyer"])
        .args([
            "--fields",
            r#"{"merchant_id":1001,"buyer_user_name":"alice","buyer_email":"a@x","extra":1}"#,
        ])
        .assert()
        .failure();

    Ok(())
}

#[test]
fn test_environment_overrides_file() -> Result<(), Box<dyn std::error::Error>> {
    let signed = gopay()
        .args(["sign", "--kind", "payment-session"])
        .args(["--fields", r#"{"merchant_id":1001,"payment_session_id":7}"#])
        .output()?;
    let rotated = gopay()
        .env("GOPAY_SECRET", "rotated")
        .args(["sign", "--kind", "payment-session"])
        .args(["--fields", r#"{"merchant_id":1001,"payment_session_id":7}"#])
        .output()?;

    assert!(signed.status.success());
    assert!(rotated.status.success());
    assert_ne!(signed.stdout, rotated.stdout);

    Ok(())
}

#[test]
fn test_missing_configuration_fails() {
    Command::new(cargo_bin!())
        .env_remove("GOPAY_SECRET")
        .args(["sign", "--kind", "payment-session"])
        .args(["--fields", r#"{"merchant_id":1001,"payment_session_id":7}"#])
        .assert()
        .failure();
}
