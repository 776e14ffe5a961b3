//! Upload lifecycle: runs one batch through the five pipeline stages.
//!
//! Stages run strictly in order: before-transform hooks, the transformer,
//! before-upload hooks, the uploader (once per record), and after-upload
//! hooks. Hooks of a stage run in registration order. The first error stops
//! the run and is reported through events and the returned `AppError`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, info};
use uuid::Uuid;

use picflow_core::config::{KEY_TRANSFORMER, KEY_UPLOADER, KEY_UPLOADER_LEGACY};
use picflow_core::error::AppError;
use picflow_core::events::{Notification, PROGRESS_FAILED, PicEvent};
use picflow_core::result::AppResult;
use picflow_core::types::{ImageRecord, Input, LifecycleState, Stage};

use crate::api::context::Context;
use crate::hooks::definitions::{Transformer, Uploader};

/// Progress reported when a run starts.
pub const PROGRESS_STARTED: i32 = 0;
/// Progress reported once the transformer is resolved.
pub const PROGRESS_TRANSFORMING: i32 = 30;
/// Progress reported once before-upload hooks are done.
pub const PROGRESS_UPLOADING: i32 = 60;
/// Progress reported when a run finishes.
pub const PROGRESS_DONE: i32 = 100;

/// Drives a batch through the pipeline.
#[derive(Debug)]
pub struct Lifecycle;

impl Lifecycle {
    /// Runs `inputs` through every stage and returns the uploaded records.
    ///
    /// Fails with `Conflict` when another run is already in flight on the
    /// same context. On failure `ctx.output` keeps the previous batch.
    pub async fn start(ctx: &mut Context, inputs: Vec<Input>) -> AppResult<Vec<ImageRecord>> {
        let _flight = InFlightGuard::acquire(&ctx.in_flight)?;

        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, inputs = inputs.len(), "Upload started");

        ctx.input = inputs;
        ctx.emit(&PicEvent::UploadProgress(PROGRESS_STARTED));

        match Self::run(ctx).await {
            Ok(batch) => {
                ctx.output = batch.clone();
                ctx.set_state(LifecycleState::Finished);
                ctx.emit(&PicEvent::UploadProgress(PROGRESS_DONE));
                ctx.emit(&PicEvent::Finished(batch.clone()));
                info!(run_id = %run_id, records = batch.len(), "Upload finished");
                Ok(batch)
            }
            Err(err) => {
                let stage = err.stage.unwrap_or(Stage::BeforeTransform);
                ctx.set_state(LifecycleState::Failed(stage));
                ctx.emit(&PicEvent::UploadProgress(PROGRESS_FAILED));
                ctx.emit(&PicEvent::Failed {
                    stage,
                    message: err.message.clone(),
                });
                ctx.notify(Notification::new(
                    format!("upload failed at {stage}"),
                    err.message.clone(),
                ));
                error!(run_id = %run_id, stage = %stage, error = %err, "Upload failed");
                Err(err)
            }
        }
    }

    async fn run(ctx: &mut Context) -> AppResult<Vec<ImageRecord>> {
        enter(ctx, Stage::BeforeTransform);
        for (name, hook) in ctx.helper.before_transform_plugins.all() {
            debug!(plugin = %name, stage = %Stage::BeforeTransform, "Running hook");
            hook.handle(ctx)
                .await
                .map_err(|e| e.in_stage(Stage::BeforeTransform))?;
        }

        enter(ctx, Stage::Transform);
        let transformer = resolve_transformer(ctx).map_err(|e| e.in_stage(Stage::Transform))?;
        ctx.emit(&PicEvent::UploadProgress(PROGRESS_TRANSFORMING));
        let input = ctx.input.clone();
        let mut batch = transformer
            .transform(ctx, &input)
            .await
            .map_err(|e| e.in_stage(Stage::Transform))?;
        debug!(records = batch.len(), "Inputs transformed");

        enter(ctx, Stage::BeforeUpload);
        for (name, hook) in ctx.helper.before_upload_plugins.all() {
            debug!(plugin = %name, stage = %Stage::BeforeUpload, "Running hook");
            hook.handle(ctx, &mut batch)
                .await
                .map_err(|e| e.in_stage(Stage::BeforeUpload))?;
        }
        ctx.emit(&PicEvent::UploadProgress(PROGRESS_UPLOADING));

        enter(ctx, Stage::Upload);
        let uploader = resolve_uploader(ctx).map_err(|e| e.in_stage(Stage::Upload))?;
        let mut uploaded = Vec::with_capacity(batch.len());
        for record in batch {
            debug!(record_id = %record.id, file_name = %record.file_name, "Uploading record");
            let record = uploader
                .upload(ctx, record)
                .await
                .map_err(|e| e.in_stage(Stage::Upload))?;
            uploaded.push(record);
        }

        enter(ctx, Stage::AfterUpload);
        for (name, hook) in ctx.helper.after_upload_plugins.all() {
            debug!(plugin = %name, stage = %Stage::AfterUpload, "Running hook");
            hook.handle(ctx, &mut uploaded)
                .await
                .map_err(|e| e.in_stage(Stage::AfterUpload))?;
        }

        Ok(uploaded)
    }
}

fn enter(ctx: &mut Context, stage: Stage) {
    ctx.set_state(LifecycleState::Running(stage));
    ctx.emit(&PicEvent::StageStarted(stage));
}

/// Resolves the transformer named by `picBed.transformer`, falling back to
/// the registry's selection or default.
fn resolve_transformer(ctx: &Context) -> AppResult<Arc<dyn Transformer>> {
    match ctx.get_config_str(KEY_TRANSFORMER) {
        Some(name) => ctx.helper.transformer.get(name).ok_or_else(|| {
            AppError::resolution(format!(
                "Transformer '{}' is not registered (available: {})",
                name,
                ctx.helper.transformer.names().join(", ")
            ))
        }),
        None => ctx.helper.transformer.get_active(),
    }
}

/// Resolves the uploader named by `picBed.uploader` (or the legacy
/// `picBed.current`), falling back to the registry's selection.
fn resolve_uploader(ctx: &Context) -> AppResult<Arc<dyn Uploader>> {
    let configured = ctx
        .get_config_str(KEY_UPLOADER)
        .or_else(|| ctx.get_config_str(KEY_UPLOADER_LEGACY));

    match configured {
        Some(name) => ctx.helper.uploader.get(name).ok_or_else(|| {
            AppError::resolution(format!(
                "Uploader '{}' is not registered (available: {})",
                name,
                ctx.helper.uploader.names().join(", ")
            ))
        }),
        None => ctx.helper.uploader.get_active(),
    }
}

/// Marks a context as running for as long as it lives.
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> AppResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::conflict("An upload is already running on this context"))?;
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
