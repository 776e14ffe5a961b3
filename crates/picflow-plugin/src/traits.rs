//! Closure adapters for quick handler creation.
//!
//! Each adapter wraps a synchronous closure and implements the matching
//! handler trait, so small plugins (and tests) need not declare a type.
//! Handlers that must await should implement the trait directly.

use async_trait::async_trait;

use picflow_core::result::AppResult;
use picflow_core::types::{ImageRecord, Input};

use crate::api::context::Context;
use crate::hooks::definitions::{
    AfterUploadHook, BeforeTransformHook, BeforeUploadHook, Transformer, Uploader,
};

/// A closure-based transformer.
pub struct FnTransformer<F> {
    handler: F,
}

impl<F> FnTransformer<F>
where
    F: Fn(&mut Context, &[Input]) -> AppResult<Vec<ImageRecord>> + Send + Sync,
{
    /// Wraps a closure.
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl<F> Transformer for FnTransformer<F>
where
    F: Fn(&mut Context, &[Input]) -> AppResult<Vec<ImageRecord>> + Send + Sync,
{
    async fn transform(&self, ctx: &mut Context, input: &[Input]) -> AppResult<Vec<ImageRecord>> {
        (self.handler)(ctx, input)
    }
}

/// A closure-based uploader.
pub struct FnUploader<F> {
    handler: F,
}

impl<F> FnUploader<F>
where
    F: Fn(&mut Context, ImageRecord) -> AppResult<ImageRecord> + Send + Sync,
{
    /// Wraps a closure.
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl<F> Uploader for FnUploader<F>
where
    F: Fn(&mut Context, ImageRecord) -> AppResult<ImageRecord> + Send + Sync,
{
    async fn upload(&self, ctx: &mut Context, record: ImageRecord) -> AppResult<ImageRecord> {
        (self.handler)(ctx, record)
    }
}

/// A closure-based before-transform hook.
pub struct FnBeforeTransform<F> {
    handler: F,
}

impl<F> FnBeforeTransform<F>
where
    F: Fn(&mut Context) -> AppResult<()> + Send + Sync,
{
    /// Wraps a closure.
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl<F> BeforeTransformHook for FnBeforeTransform<F>
where
    F: Fn(&mut Context) -> AppResult<()> + Send + Sync,
{
    async fn handle(&self, ctx: &mut Context) -> AppResult<()> {
        (self.handler)(ctx)
    }
}

/// A closure-based before-upload hook.
pub struct FnBeforeUpload<F> {
    handler: F,
}

impl<F> FnBeforeUpload<F>
where
    F: Fn(&mut Context, &mut Vec<ImageRecord>) -> AppResult<()> + Send + Sync,
{
    /// Wraps a closure.
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl<F> BeforeUploadHook for FnBeforeUpload<F>
where
    F: Fn(&mut Context, &mut Vec<ImageRecord>) -> AppResult<()> + Send + Sync,
{
    async fn handle(&self, ctx: &mut Context, batch: &mut Vec<ImageRecord>) -> AppResult<()> {
        (self.handler)(ctx, batch)
    }
}

/// A closure-based after-upload hook.
pub struct FnAfterUpload<F> {
    handler: F,
}

impl<F> FnAfterUpload<F>
where
    F: Fn(&mut Context, &mut [ImageRecord]) -> AppResult<()> + Send + Sync,
{
    /// Wraps a closure.
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl<F> AfterUploadHook for FnAfterUpload<F>
where
    F: Fn(&mut Context, &mut [ImageRecord]) -> AppResult<()> + Send + Sync,
{
    async fn handle(&self, ctx: &mut Context, batch: &mut [ImageRecord]) -> AppResult<()> {
        (self.handler)(ctx, batch)
    }
}

impl<F> std::fmt::Debug for FnTransformer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnTransformer(<closure>)")
    }
}

impl<F> std::fmt::Debug for FnUploader<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnUploader(<closure>)")
    }
}
