use crate::cli::JobCommand;
use anyhow::Context;
use jobly::{GenericClient, Job, NewJob, UpdatePayload};
use serde_json::{Value, json};

pub async fn run(conn: &impl GenericClient, cmd: JobCommand) -> anyhow::Result<Value> {
    let out = match cmd {
        JobCommand::List(filter) => {
            let jobs = Job::search(conn, filter).await?;
            json!({ "jobs": jobs })
        }
        JobCommand::Get(id) => {
            let job = Job::get(conn, id).await?;
            json!({ "job": job })
        }
        JobCommand::Create { data } => {
            let new: NewJob = serde_json::from_str(&data).context("invalid job JSON in --data")?;
            let job = Job::create(conn, &new).await?;
            json!({ "job": job })
        }
        JobCommand::Update { id, data } => {
            let payload: UpdatePayload =
                serde_json::from_str(&data).context("invalid update JSON in --data")?;
            let job = Job::update(conn, id, payload).await?;
            json!({ "job": job })
        }
        JobCommand::Delete(id) => {
            Job::remove(conn, id).await?;
            json!({ "deleted": id })
        }
    };
    Ok(out)
}
