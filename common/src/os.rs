use log::{debug, warn};
use windows::{
    core::{s, Error, PCSTR},
    Win32::{
        Foundation::{ERROR_CLASS_ALREADY_EXISTS, HWND, LPARAM, LRESULT, RECT, WPARAM},
        Graphics::Gdi::UpdateWindow,
        System::LibraryLoader::GetModuleHandleA,
        UI::WindowsAndMessaging::{
            CreateWindowExA, DefWindowProcA, DispatchMessageA, GetClientRect, LoadCursorA,
            PeekMessageA, PostQuitMessage, RegisterClassExA, ShowWindow, TranslateMessage,
            CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, IDC_ARROW, MSG, PM_REMOVE, SW_HIDE, SW_SHOW,
            WM_DESTROY, WM_QUIT, WNDCLASSEXA, WS_OVERLAPPEDWINDOW,
        },
    },
};

use crate::{config::WindowConfig, error::InitError, util::AsCString};

const CLASS_NAME: PCSTR = s!("MinimalD3D11Window");

/// Something pulled off the thread's message queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A message that was translated and handed to the window procedure.
    Dispatched { message: u32 },
    /// The window was destroyed and the loop should end.
    Quit { exit_code: i32 },
}

pub struct Window {
    hwnd: HWND,
}

impl Window {
    pub(crate) fn new(config: &WindowConfig) -> Result<Self, InitError> {
        let creation_error = |e: Error| InitError::WindowCreation(e.to_string());

        let instance = unsafe { GetModuleHandleA(None) }.map_err(creation_error)?;

        let wc = WNDCLASSEXA {
            cbSize: std::mem::size_of::<WNDCLASSEXA>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wndproc),
            hInstance: instance.into(),
            hCursor: unsafe { LoadCursorA(None, PCSTR(IDC_ARROW.0 as _)) }
                .map_err(creation_error)?,
            lpszClassName: CLASS_NAME,
            ..Default::default()
        };

        if unsafe { RegisterClassExA(&wc) } == 0 {
            let e = Error::from_win32();
            if e.code() != ERROR_CLASS_ALREADY_EXISTS.to_hresult() {
                return Err(creation_error(e));
            }
        }

        let title = config.title.as_c_string();

        // The configured size is the outer frame; the client area ends up smaller.
        let hwnd = unsafe {
            CreateWindowExA(
                Default::default(),
                CLASS_NAME,
                PCSTR(title.as_ptr() as _),
                WS_OVERLAPPEDWINDOW,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                config.size.0,
                config.size.1,
                None, // No parent window.
                None, // No menus.
                instance,
                None, // No window data.
            )
        }
        .map_err(creation_error)?;

        if hwnd == HWND::default() {
            return Err(InitError::WindowCreation(
                "failed to create a window handle".to_string(),
            ));
        }

        debug!("WINDOW: created {:?} {}x{}", config.title, config.size.0, config.size.1);

        Ok(Self { hwnd })
    }

    pub fn get_handle(&self) -> HWND {
        self.hwnd
    }

    /// Client-area size in pixels, chrome excluded.
    pub fn get_physical_size(&self) -> (i32, i32) {
        let mut window_rect = RECT::default();
        if let Err(e) = unsafe { GetClientRect(self.hwnd, &mut window_rect) } {
            warn!("failed to get client rect {e}");
        }

        (
            window_rect.right - window_rect.left,
            window_rect.bottom - window_rect.top,
        )
    }

    pub fn set_visible(&self, visible: bool) {
        unsafe {
            if visible {
                let _ = ShowWindow(self.hwnd, SW_SHOW);
                let _ = UpdateWindow(self.hwnd);
            } else {
                let _ = ShowWindow(self.hwnd, SW_HIDE);
            }
        }
    }
}

pub struct App {}

impl App {
    pub fn init(config: &WindowConfig) -> Result<(App, Window), InitError> {
        let app = App {};

        let window = Window::new(config)?;
        window.set_visible(true);

        Ok((app, window))
    }

    /// Never blocks; `None` once the queue is empty.
    pub fn poll_event(&mut self) -> Option<Event> {
        let mut message = MSG::default();
        if !unsafe { PeekMessageA(&mut message, None, 0, 0, PM_REMOVE) }.as_bool() {
            return None;
        }

        if message.message == WM_QUIT {
            return Some(Event::Quit {
                exit_code: message.wParam.0 as i32,
            });
        }

        unsafe {
            let _ = TranslateMessage(&message);
            DispatchMessageA(&message);
        }

        Some(Event::Dispatched {
            message: message.message,
        })
    }

    /// Drains pending messages. Returns `false` once the quit signal has been seen.
    pub fn run(&mut self) -> bool {
        while let Some(event) = self.poll_event() {
            if let Event::Quit { exit_code } = event {
                debug!("WINDOW: quit requested ({exit_code})");
                return false;
            }
        }

        true
    }
}

extern "system" fn wndproc(hwnd: HWND, message: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match message {
        WM_DESTROY => {
            unsafe { PostQuitMessage(0) };
            LRESULT::default()
        }

        _ => unsafe { DefWindowProcA(hwnd, message, wparam, lparam) },
    }
}
