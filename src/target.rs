//! Off-screen render targets.
//!
//! A render target owns one color attachment plus a combined depth/stencil
//! attachment sized to a viewport. The scene rasterizer draws into the
//! pipeline's initial target; every post-processing pass then samples the
//! previous target and writes into its own.

use crate::error::PipelineError;
use crate::gpu::{RenderContext, TextureUnits};

/// Depth/stencil format used by every render target.
pub const DEPTH_STENCIL_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Depth24PlusStencil8;

/// An off-screen destination for drawing: a color texture and a combined
/// depth/stencil texture, bindable in place of the screen.
///
/// Both attachments are created and replaced together — a target never holds
/// a color buffer at one size and a depth buffer at another, and a failed
/// creation leaves no half-built target behind.
pub struct RenderTarget {
    label: String,
    width: u32,
    height: u32,
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_stencil: wgpu::Texture,
    depth_stencil_view: wgpu::TextureView,
}

impl RenderTarget {
    /// Allocate color + depth/stencil storage sized to `(width, height)`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidArgument`] for zero dimensions and
    /// [`PipelineError::ResourceCreation`] when the requested size exceeds
    /// what the device supports. Both are fatal to this render path; callers
    /// should treat them as configuration failures, not per-frame conditions.
    pub fn new(
        ctx: &RenderContext,
        label: &str,
        width: u32,
        height: u32,
    ) -> Result<Self, PipelineError> {
        let (color, color_view, depth_stencil, depth_stencil_view) =
            Self::create_attachments(ctx, label, width, height)?;

        log::debug!("render target '{label}' created at {width}x{height}");

        Ok(Self {
            label: label.to_owned(),
            width,
            height,
            color,
            color_view,
            depth_stencil,
            depth_stencil_view,
        })
    }

    fn validate_dimensions(
        label: &str,
        width: u32,
        height: u32,
        max_dim: u32,
    ) -> Result<(), PipelineError> {
        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidArgument(format!(
                "render target '{label}' dimensions must be non-zero, got {width}x{height}"
            )));
        }
        if width > max_dim || height > max_dim {
            return Err(PipelineError::ResourceCreation {
                label: label.to_owned(),
                reason: format!(
                    "{width}x{height} exceeds the device limit of {max_dim}"
                ),
            });
        }
        Ok(())
    }

    /// Whether a resize to `requested` must reallocate the attachments.
    fn needs_recreate(current: (u32, u32), requested: (u32, u32)) -> bool {
        current != requested
    }

    fn create_attachments(
        ctx: &RenderContext,
        label: &str,
        width: u32,
        height: u32,
    ) -> Result<
        (wgpu::Texture, wgpu::TextureView, wgpu::Texture, wgpu::TextureView),
        PipelineError,
    > {
        Self::validate_dimensions(
            label,
            width,
            height,
            ctx.device.limits().max_texture_dimension_2d,
        )?;

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let color = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{label} Color")),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ctx.format(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let color_view =
            color.create_view(&wgpu::TextureViewDescriptor::default());

        let depth_stencil = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{label} Depth/Stencil")),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_STENCIL_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_stencil_view =
            depth_stencil.create_view(&wgpu::TextureViewDescriptor::default());

        Ok((color, color_view, depth_stencil, depth_stencil_view))
    }

    /// Resize the target. A no-op when the size is unchanged, so forwarding
    /// every frame's viewport size here is free while the window is stable.
    ///
    /// Otherwise both attachments are destroyed and recreated at the new
    /// size; the previous contents are lost. Returns `true` if a
    /// reallocation happened.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`new`](Self::new); on error the existing
    /// attachments are left untouched.
    pub fn resize(
        &mut self,
        ctx: &RenderContext,
        width: u32,
        height: u32,
    ) -> Result<bool, PipelineError> {
        if !Self::needs_recreate(self.size(), (width, height)) {
            return Ok(false);
        }

        let (color, color_view, depth_stencil, depth_stencil_view) =
            Self::create_attachments(ctx, &self.label, width, height)?;

        // Replace everything at once; the old textures drop here.
        self.width = width;
        self.height = height;
        self.color = color;
        self.color_view = color_view;
        self.depth_stencil = depth_stencil;
        self.depth_stencil_view = depth_stencil_view;

        log::debug!(
            "render target '{}' recreated at {width}x{height}",
            self.label
        );
        Ok(true)
    }

    /// Register this target's color texture with the frame's unit allocator
    /// so the next pass can sample it without colliding with other bindings.
    /// Returns the claimed unit.
    ///
    /// # Errors
    ///
    /// Propagates unit exhaustion from the allocator.
    pub fn bind(&self, units: &mut TextureUnits) -> Result<u32, PipelineError> {
        units.allocate(&self.label)
    }

    /// Encode a clear of the selected attachments. `color` is written to the
    /// color attachment when `clear_color` is set; depth clears to 1.0 and
    /// stencil to 0 when their flags are set.
    pub fn clear(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        color: wgpu::Color,
        clear_color: bool,
        clear_depth: bool,
        clear_stencil: bool,
    ) {
        if !clear_color && !clear_depth && !clear_stencil {
            return;
        }

        let color_attachments = [Some(wgpu::RenderPassColorAttachment {
            view: &self.color_view,
            depth_slice: None,
            resolve_target: None,
            ops: wgpu::Operations {
                load: if clear_color {
                    wgpu::LoadOp::Clear(color)
                } else {
                    wgpu::LoadOp::Load
                },
                store: wgpu::StoreOp::Store,
            },
        })];

        let depth_stencil_attachment =
            if clear_depth || clear_stencil {
                Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_stencil_view,
                    depth_ops: Some(wgpu::Operations {
                        load: if clear_depth {
                            wgpu::LoadOp::Clear(1.0)
                        } else {
                            wgpu::LoadOp::Load
                        },
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: if clear_stencil {
                            wgpu::LoadOp::Clear(0)
                        } else {
                            wgpu::LoadOp::Load
                        },
                        store: wgpu::StoreOp::Store,
                    }),
                })
            } else {
                None
            };

        // The pass encodes nothing but the load ops; dropping it restores
        // the encoder for whoever draws next.
        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(&format!("{} Clear", self.label)),
            color_attachments: &color_attachments,
            depth_stencil_attachment,
            ..Default::default()
        });
    }

    /// Begin a render pass drawing into this target, for the upstream scene
    /// rasterizer. The returned pass borrows the encoder; dropping it hands
    /// the encoder back.
    pub fn begin_draw<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        load: wgpu::LoadOp<wgpu::Color>,
    ) -> wgpu::RenderPass<'e> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(&format!("{} Draw", self.label)),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.color_view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_stencil_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Store,
                    }),
                },
            ),
            ..Default::default()
        })
    }

    /// Target label, used for GPU resource names and diagnostics.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Current height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current `(width, height)` in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The color attachment texture.
    #[must_use]
    pub fn color_texture(&self) -> &wgpu::Texture {
        &self.color
    }

    /// The combined depth/stencil attachment texture.
    #[must_use]
    pub fn depth_stencil_texture(&self) -> &wgpu::Texture {
        &self.depth_stencil
    }

    /// View of the color attachment, for sampling by the next pass.
    #[must_use]
    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    /// View of the combined depth/stencil attachment.
    #[must_use]
    pub fn depth_stencil_view(&self) -> &wgpu::TextureView {
        &self.depth_stencil_view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_size_resize_is_a_no_op() {
        // resize() short-circuits before touching the attachments when the
        // requested size matches the current one.
        assert!(!RenderTarget::needs_recreate((640, 360), (640, 360)));
        assert!(RenderTarget::needs_recreate((640, 360), (640, 361)));
        assert!(RenderTarget::needs_recreate((640, 360), (1280, 720)));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        for (w, h) in [(0, 360), (640, 0), (0, 0)] {
            assert!(matches!(
                RenderTarget::validate_dimensions("Scene", w, h, 8192),
                Err(PipelineError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn oversized_dimensions_fail_resource_creation() {
        let err = RenderTarget::validate_dimensions("Scene", 8193, 360, 8192)
            .expect_err("exceeds the device limit");
        match err {
            PipelineError::ResourceCreation { label, reason } => {
                assert_eq!(label, "Scene");
                assert!(reason.contains("8192"));
            }
            other => panic!("expected ResourceCreation, got {other}"),
        }
    }

    #[test]
    fn boundary_dimensions_are_accepted() {
        assert!(
            RenderTarget::validate_dimensions("Scene", 1, 1, 8192).is_ok()
        );
        assert!(
            RenderTarget::validate_dimensions("Scene", 8192, 8192, 8192)
                .is_ok()
        );
    }
}
