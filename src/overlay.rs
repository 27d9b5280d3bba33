//! Crosshair overlay window
//!
//! A borderless override-redirect X11 window with a 32-bit ARGB visual
//! (transparent background), marked always-on-top and excluded from the
//! taskbar/pager, with an empty input shape so every pointer event falls
//! through to whatever is beneath. The four arms are painted with the
//! RENDER extension by compositing a solid-fill picture onto the window.
//!
//! Every method runs on the thread that owns the connection (the UI
//! thread); the hotkey listener reaches this type only through the message
//! channel drained by the settings panel.

use anyhow::{Context, Result};
use tracing::{error, info};
use x11rb::connection::Connection;
use x11rb::protocol::render::{
    ConnectionExt as RenderExt, CreatePictureAux, PictOp, Picture, Pictformat,
};
use x11rb::protocol::shape::{self, ConnectionExt as ShapeExt};
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as WrapperExt;

use crate::color::Rgb;
use crate::config::CrosshairConfig;
use crate::constants::x11;
use crate::geometry::{self, OverlayLayout};

pub struct OverlayWindow {
    conn: RustConnection,
    screen_width: u16,
    screen_height: u16,
    window: Window,
    colormap: Colormap,
    /// Picture wrapping the window, the compositing destination
    picture: Picture,
    /// Solid fill in the current crosshair color
    fill: Picture,
    fill_color: Rgb,
    /// Placement painted last; repainted verbatim on Expose
    layout: OverlayLayout,
    visible: bool,
}

impl OverlayWindow {
    /// Connect to the X server and create the (unmapped) overlay window
    /// sized and positioned for `config`.
    pub fn new(config: &CrosshairConfig) -> Result<Self> {
        let (conn, screen_num) =
            x11rb::connect(None).context("Failed to connect to X11 display")?;
        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        let (screen_width, screen_height) = (screen.width_in_pixels, screen.height_in_pixels);
        info!(
            "Connected to X11 for overlay: screen={screen_num}, dimensions={screen_width}x{screen_height}"
        );

        let visual = find_argb_visual(screen)
            .context("No 32-bit ARGB visual available (is a compositor running?)")?;

        let layout = geometry::layout(config, screen_width, screen_height);

        let colormap = conn.generate_id().context("Failed to generate colormap ID")?;
        conn.create_colormap(ColormapAlloc::NONE, colormap, root, visual)
            .context("Failed to create ARGB colormap")?;

        let window = conn.generate_id().context("Failed to generate window ID")?;
        conn.create_window(
            x11::ARGB_DEPTH,
            window,
            root,
            layout.x as i16,
            layout.y as i16,
            layout.side,
            layout.side,
            0,
            WindowClass::INPUT_OUTPUT,
            visual,
            &CreateWindowAux::new()
                .override_redirect(x11::OVERRIDE_REDIRECT)
                .border_pixel(0)
                .background_pixel(0)
                .colormap(colormap)
                .event_mask(EventMask::EXPOSURE),
        )
        .context("Failed to create overlay window")?;

        Self::setup_window_properties(&conn, window)?;
        clear_input_shape(&conn, window)?;

        let pict_format = find_pictformat(&conn, x11::ARGB_DEPTH)
            .context("Failed to get ARGB picture format for overlay")?;
        let picture = conn.generate_id().context("Failed to generate picture ID")?;
        conn.render_create_picture(picture, window, pict_format, &CreatePictureAux::new())
            .context("Failed to create overlay picture")?;

        let fill = conn.generate_id().context("Failed to generate fill ID")?;
        conn.render_create_solid_fill(fill, config.color.to_render_color())
            .context("Failed to create crosshair fill")?;

        conn.flush().context("Failed to flush after overlay setup")?;
        info!(window, side = layout.side, "Created overlay window");

        Ok(Self {
            conn,
            screen_width,
            screen_height,
            window,
            colormap,
            picture,
            fill,
            fill_color: config.color,
            layout,
            visible: false,
        })
    }

    /// Mark the window always-on-top and keep it out of the window switcher
    /// and taskbar, then tag it with our WM_CLASS.
    fn setup_window_properties(conn: &RustConnection, window: Window) -> Result<()> {
        let intern = |name: &[u8]| -> Result<Atom> {
            Ok(conn
                .intern_atom(false, name)
                .context("Failed to intern atom")?
                .reply()
                .context("Failed to get atom reply")?
                .atom)
        };

        let net_wm_state = intern(b"_NET_WM_STATE")?;
        let state_atoms = [
            intern(b"_NET_WM_STATE_ABOVE")?,
            intern(b"_NET_WM_STATE_SKIP_TASKBAR")?,
            intern(b"_NET_WM_STATE_SKIP_PAGER")?,
        ];
        conn.change_property32(
            PropMode::REPLACE,
            window,
            net_wm_state,
            AtomEnum::ATOM,
            &state_atoms,
        )
        .context("Failed to set overlay window state hints")?;

        let net_wm_window_type = intern(b"_NET_WM_WINDOW_TYPE")?;
        let type_utility = intern(b"_NET_WM_WINDOW_TYPE_UTILITY")?;
        conn.change_property32(
            PropMode::REPLACE,
            window,
            net_wm_window_type,
            AtomEnum::ATOM,
            &[type_utility],
        )
        .context("Failed to set overlay window type")?;

        conn.change_property8(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_CLASS,
            AtomEnum::STRING,
            x11::WM_CLASS,
        )
        .context("Failed to set WM_CLASS on overlay")?;

        Ok(())
    }

    /// Recompute geometry from `config`, reposition/resize the window and
    /// repaint. Idempotent and cheap; called on every slider tick.
    pub fn refresh(&mut self, config: &CrosshairConfig) -> Result<()> {
        self.layout = geometry::layout(config, self.screen_width, self.screen_height);

        self.conn
            .configure_window(
                self.window,
                &ConfigureWindowAux::new()
                    .x(self.layout.x)
                    .y(self.layout.y)
                    .width(u32::from(self.layout.side))
                    .height(u32::from(self.layout.side))
                    .stack_mode(StackMode::ABOVE),
            )
            .context("Failed to reposition overlay window")?;

        // A custom shape does not track resizes, re-apply the empty region
        clear_input_shape(&self.conn, self.window)?;
        self.set_fill_color(config.color)?;
        self.repaint()?;
        self.conn
            .flush()
            .context("Failed to flush after overlay refresh")?;
        Ok(())
    }

    pub fn show(&mut self) -> Result<()> {
        if self.visible {
            return Ok(());
        }
        self.conn
            .map_window(self.window)
            .context("Failed to map overlay window")?;
        // Only record visibility once the map request is accepted
        self.visible = true;
        self.repaint()?;
        self.conn
            .flush()
            .context("Failed to flush after overlay show")?;
        info!("Overlay shown");
        Ok(())
    }

    pub fn hide(&mut self) -> Result<()> {
        if !self.visible {
            return Ok(());
        }
        self.conn
            .unmap_window(self.window)
            .context("Failed to unmap overlay window")?;
        self.visible = false;
        self.conn
            .flush()
            .context("Failed to flush after overlay hide")?;
        info!("Overlay hidden");
        Ok(())
    }

    /// Flip visibility; returns the new state
    pub fn toggle(&mut self) -> Result<bool> {
        if self.visible {
            self.hide()?;
        } else {
            self.show()?;
        }
        Ok(self.visible)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Drain pending X11 events without blocking, repainting on Expose.
    /// Called from the UI loop every frame.
    pub fn pump_events(&mut self) -> Result<()> {
        let mut needs_repaint = false;
        while let Some(event) = self
            .conn
            .poll_for_event()
            .context("Failed to poll overlay X11 events")?
        {
            if let x11rb::protocol::Event::Expose(expose) = event {
                if expose.window == self.window && expose.count == 0 {
                    needs_repaint = true;
                }
            }
        }
        if needs_repaint {
            self.repaint()?;
            self.conn
                .flush()
                .context("Failed to flush after expose repaint")?;
        }
        Ok(())
    }

    /// Swap the solid-fill picture when the configured color changes
    fn set_fill_color(&mut self, color: Rgb) -> Result<()> {
        if color == self.fill_color {
            return Ok(());
        }
        // Create the replacement before freeing the old fill, so a failed
        // create never leaves a dangling picture ID behind
        let fill = self.conn.generate_id().context("Failed to generate fill ID")?;
        self.conn
            .render_create_solid_fill(fill, color.to_render_color())
            .context("Failed to create crosshair fill")?;
        self.conn
            .render_free_picture(self.fill)
            .context("Failed to free previous fill")?;
        self.fill = fill;
        self.fill_color = color;
        Ok(())
    }

    /// Clear the whole window to transparent and composite the four arms
    fn repaint(&self) -> Result<()> {
        self.conn
            .render_composite(
                PictOp::CLEAR,
                self.fill,
                0u32,
                self.picture,
                0,
                0,
                0,
                0,
                0,
                0,
                self.layout.side,
                self.layout.side,
            )
            .context("Failed to clear overlay background")?;

        for arm in self.layout.arms {
            self.conn
                .render_composite(
                    PictOp::SRC,
                    self.fill,
                    0u32,
                    self.picture,
                    0,
                    0,
                    0,
                    0,
                    arm.x,
                    arm.y,
                    arm.width,
                    arm.height,
                )
                .context("Failed to paint crosshair arm")?;
        }
        Ok(())
    }
}

impl Drop for OverlayWindow {
    fn drop(&mut self) {
        // Clean up each resource independently to prevent cascade failures
        if let Err(e) = self.conn.render_free_picture(self.fill) {
            error!("Failed to free fill picture {}: {}", self.fill, e);
        }

        if let Err(e) = self.conn.render_free_picture(self.picture) {
            error!("Failed to free overlay picture {}: {}", self.picture, e);
        }

        if let Err(e) = self.conn.destroy_window(self.window) {
            error!("Failed to destroy overlay window {}: {}", self.window, e);
        }

        if let Err(e) = self.conn.free_colormap(self.colormap) {
            error!("Failed to free colormap {}: {}", self.colormap, e);
        }

        if let Err(e) = self.conn.flush() {
            error!("Failed to flush X11 connection during cleanup: {}", e);
        }
    }
}

/// Remove the window's input region entirely so all pointer input passes
/// through to whatever is beneath
fn clear_input_shape(conn: &RustConnection, window: Window) -> Result<()> {
    conn.shape_rectangles(
        shape::SO::SET,
        shape::SK::INPUT,
        ClipOrdering::UNSORTED,
        window,
        0,
        0,
        &[],
    )
    .context("Failed to clear overlay input shape")?;
    Ok(())
}

/// First 32-bit visual on the screen, if any
fn find_argb_visual(screen: &Screen) -> Option<Visualid> {
    screen
        .allowed_depths
        .iter()
        .find(|depth| depth.depth == x11::ARGB_DEPTH)
        .and_then(|depth| depth.visuals.first())
        .map(|visual| visual.visual_id)
}

/// RENDER picture format with alpha for the given depth
fn find_pictformat(conn: &RustConnection, depth: u8) -> Result<Pictformat> {
    conn.render_query_pict_formats()
        .context("Failed to query RENDER picture formats")?
        .reply()
        .context("Failed to get reply for RENDER picture formats query")?
        .formats
        .iter()
        .find(|format| format.depth == depth && format.direct.alpha_mask != 0)
        .map(|format| format.id)
        .with_context(|| {
            format!("Could not find picture format (depth={depth}). Check RENDER extension support.")
        })
}
