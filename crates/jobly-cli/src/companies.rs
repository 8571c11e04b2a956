use crate::cli::CompanyCommand;
use anyhow::Context;
use jobly::{Company, GenericClient, NewCompany, UpdatePayload};
use serde_json::{Value, json};

pub async fn run(conn: &impl GenericClient, cmd: CompanyCommand) -> anyhow::Result<Value> {
    let out = match cmd {
        CompanyCommand::List(filter) => {
            let companies = Company::search(conn, filter).await?;
            json!({ "companies": companies })
        }
        CompanyCommand::Get(handle) => {
            let company = Company::get(conn, &handle).await?;
            json!({ "company": company })
        }
        CompanyCommand::Create { data } => {
            let new: NewCompany =
                serde_json::from_str(&data).context("invalid company JSON in --data")?;
            let company = Company::create(conn, &new).await?;
            json!({ "company": company })
        }
        CompanyCommand::Update { handle, data } => {
            let payload: UpdatePayload =
                serde_json::from_str(&data).context("invalid update JSON in --data")?;
            let company = Company::update(conn, &handle, payload).await?;
            json!({ "company": company })
        }
        CompanyCommand::Delete(handle) => {
            Company::remove(conn, &handle).await?;
            json!({ "deleted": handle })
        }
    };
    Ok(out)
}
