use std::io::ErrorKind;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::future::Future;

use chrono::{DateTime, Local, TimeDelta};
use futures::stream::FuturesUnordered;
use tracing::Instrument;
use tokio::task::JoinHandle;
use tokio::io::AsyncWriteExt;
use tokio::fs::File;
use serde::{Serialize, Deserialize};

use crate::state::ArcShared;
use crate::error::{self, Context};

mod session;

#[derive(Debug, Default, Serialize, Deserialize)]
struct JobInfo {
    last_run: Option<DateTime<Local>>
}

impl JobInfo {
    fn load(job_file: &PathBuf) -> error::Result<Self> {
        let result = std::fs::OpenOptions::new()
            .read(true)
            .open(job_file);

        match result {
            Ok(file) => serde_json::from_reader(&file)
                .context("failed to read jobs file"),
            Err(err) => match err.kind() {
                ErrorKind::NotFound => Ok(JobInfo::default()),
                _ => Err(err.into()),
            }
        }
    }

    async fn save(&self, job_file: &PathBuf) -> error::Result<()> {
        let json_buffer = serde_json::to_vec(self)
            .context("failed to create json job info")?;

        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(job_file)
            .await
            .context("failed to open job file")?;

        file.write_all(&json_buffer)
            .await
            .context("failed to write job info to file")?;

        Ok(())
    }
}

async fn run_once<F, T>(
    state: &ArcShared,
    job_info: &mut JobInfo,
    job_file: &PathBuf,
    runner: &F
) -> error::Result<()>
where
    T: Future<Output = error::Result<()>>,
    F: Fn(ArcShared) -> T,
{
    if let Err(err) = runner(Arc::clone(state)).await {
        tracing::error!("job failed with error: {err}");
    } else {
        let local_now = Local::now();

        tracing::debug!("job finished {local_now}");

        job_info.last_run = Some(local_now);

        job_info.save(job_file).await?;
    }

    Ok(())
}

async fn job_task<F, T>(
    state: ArcShared,
    mut upcoming: cron::OwnedScheduleIterator<Local>,
    mut job_info: JobInfo,
    job_file: PathBuf,
    runner: F
) -> error::Result<()>
where
    T: Future<Output = error::Result<()>>,
    F: Fn(ArcShared) -> T,
{
    let zero_delta = TimeDelta::zero();

    if job_info.last_run.is_none() {
        tracing::info!("job has never run. running job");

        run_once(&state, &mut job_info, &job_file, &runner).await?;
    }

    while let Some(next) = upcoming.next() {
        let now = Local::now();
        let delta = next - now;

        if delta < zero_delta {
            continue;
        }

        tracing::debug!("waiting for {delta}");

        tokio::time::sleep(delta.to_std().unwrap()).await;

        tracing::info!("running job");

        run_once(&state, &mut job_info, &job_file, &runner).await?;
    }

    tracing::info!("job finished");

    Ok(())
}

fn get_jobs_dir(data: PathBuf) -> error::Result<PathBuf> {
    let jobs_dir = data.join("jobs");

    let metadata = match jobs_dir.metadata() {
        Ok(m) => m,
        Err(err) => match err.kind() {
            ErrorKind::NotFound => {
                std::fs::create_dir(&jobs_dir)?;

                return Ok(jobs_dir);
            },
            _ => {
                return Err(err.into());
            }
        }
    };

    if !metadata.is_dir() {
        Err(error::Error::new()
            .message("jobs data directory is not a directory"))
    } else {
        Ok(jobs_dir)
    }
}

fn spawn_job<F, T>(
    jobs_dir: &PathBuf,
    state: &ArcShared,
    name: &'static str,
    crontab: &'static str,
    runner: F
) -> error::Result<JoinHandle<()>>
where
    T: Future<Output = error::Result<()>> + Send,
    F: Fn(ArcShared) -> T + Send + Sync + 'static,
{
    let local_state = Arc::clone(state);
    let job_file = jobs_dir.join(format!("{name}.json"));
    let job_info = JobInfo::load(&job_file)?;

    let schedule = cron::Schedule::from_str(crontab)
        .context("failed to parse crontab")?;

    let upcoming = if let Some(last_run) = job_info.last_run {
        schedule.after_owned(last_run)
    } else {
        schedule.upcoming_owned(Local)
    };

    Ok(tokio::spawn(async move {
        let job_span = tracing::span!(
            tracing::Level::INFO,
            "job",
            name = name
        );

        let result = job_task(local_state, upcoming, job_info, job_file, runner)
            .instrument(job_span)
            .await;

        if let Err(err) = result {
            tracing::error!("job {name} failed with error {err}");
        }
    }))
}

pub fn background(state: &ArcShared, data: PathBuf) -> error::Result<FuturesUnordered<JoinHandle<()>>> {
    let jobs_dir = get_jobs_dir(data)?;
    let waiter = FuturesUnordered::new();

    waiter.push(spawn_job(&jobs_dir, state, "session_cleanup", "0 0 0,12 * * * *", session::cleanup)?);

    Ok(waiter)
}
