use crate::bot::Bot;
use crate::moves::Move;
use crate::piece::TeamType;
use crate::position::Position;
use crate::referee::Referee;
use crate::state::GameState;
use libloading::{Library, Symbol};
use std::path::Path;
use std::time::Duration;

/// FFI-safe source/destination pair. Plugins answer moves in this shape;
/// the host resolves piece and team from the board.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SquarePair {
    pub from: Position,
    pub to: Position,
}

/// FFI-safe representation of a bot plugin.
/// This is the interface used to load bots from dynamic libraries.
#[repr(C)]
pub struct BotPlugin {
    pub bot_ptr: *mut (),
    pub vtable: BotVTable,
}

/// Virtual table for bot operations.
/// All bot implementations must provide these function pointers.
#[repr(C)]
pub struct BotVTable {
    pub name: unsafe extern "C" fn(*mut ()) -> *const std::os::raw::c_char,
    pub choose_move: unsafe extern "C" fn(*mut (), *const GameState, u64) -> *const SquarePair,
    pub game_start: unsafe extern "C" fn(*mut (), TeamType),
    pub notify_move: unsafe extern "C" fn(*mut (), SquarePair),
    pub game_end: unsafe extern "C" fn(*mut ()),
    pub drop: unsafe extern "C" fn(*mut ()),
}

/// Type signature for the plugin creation function.
/// Every plugin library must export a function with this signature.
pub type CreateBotFn = unsafe extern "C" fn() -> *mut BotPlugin;

/// Wrapper that loads a bot from a dynamic library.
pub struct PluginBot {
    plugin: Box<BotPlugin>,
    _library: Library, // Keep library alive
}

impl PluginBot {
    /// Load a bot plugin from a dynamic library file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        unsafe {
            let library = Library::new(path.as_ref())
                .map_err(|e| format!("Failed to load library: {}", e))?;

            let create_bot: Symbol<CreateBotFn> = library
                .get(b"create_bot")
                .map_err(|e| format!("Failed to find create_bot function: {}", e))?;

            let plugin_ptr = create_bot();
            if plugin_ptr.is_null() {
                return Err("create_bot returned null".to_string());
            }

            let plugin = Box::from_raw(plugin_ptr);

            Ok(PluginBot {
                plugin,
                _library: library,
            })
        }
    }
}

impl Bot for PluginBot {
    fn name(&self) -> &str {
        unsafe {
            let name_ptr = (self.plugin.vtable.name)(self.plugin.bot_ptr);
            if name_ptr.is_null() {
                return "Unknown";
            }
            let c_str = std::ffi::CStr::from_ptr(name_ptr);
            c_str.to_str().unwrap_or("Invalid UTF-8")
        }
    }

    fn choose_move(
        &mut self,
        state: &GameState,
        _referee: &Referee,
        time_limit: Duration,
    ) -> Option<(Position, Position)> {
        // Plugins validate on their own side with their own engine; the
        // host re-validates whatever comes back.
        unsafe {
            let pair_ptr = (self.plugin.vtable.choose_move)(
                self.plugin.bot_ptr,
                state as *const GameState,
                time_limit.as_millis() as u64,
            );

            if pair_ptr.is_null() {
                None
            } else {
                let pair = *pair_ptr;
                Some((pair.from, pair.to))
            }
        }
    }

    fn game_start(&mut self, team: TeamType) {
        unsafe {
            (self.plugin.vtable.game_start)(self.plugin.bot_ptr, team);
        }
    }

    fn notify_move(&mut self, mv: &Move) {
        unsafe {
            (self.plugin.vtable.notify_move)(
                self.plugin.bot_ptr,
                SquarePair {
                    from: mv.from,
                    to: mv.to,
                },
            );
        }
    }

    fn game_end(&mut self) {
        unsafe {
            (self.plugin.vtable.game_end)(self.plugin.bot_ptr);
        }
    }
}

impl Drop for PluginBot {
    fn drop(&mut self) {
        unsafe {
            (self.plugin.vtable.drop)(self.plugin.bot_ptr);
        }
    }
}

unsafe impl Send for PluginBot {}

/// Helper macro for implementing a bot plugin.
/// This handles all the FFI boilerplate. The bot type must implement
/// `Default` and provide inherent methods `name()`,
/// `choose_squares(&GameState, Duration) -> Option<(Position, Position)>`,
/// `game_start(TeamType)`, `notify_squares(Position, Position)` and
/// `game_end()`.
#[macro_export]
macro_rules! citadel_export_bot {
    ($bot_type:ty) => {
        use std::ffi::CString;
        use std::os::raw::c_char;

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn create_bot() -> *mut $crate::plugin::BotPlugin {
            let bot = Box::new(<$bot_type>::default());
            let bot_ptr = Box::into_raw(bot) as *mut ();

            let vtable = $crate::plugin::BotVTable {
                name: bot_name,
                choose_move: bot_choose_move,
                game_start: bot_game_start,
                notify_move: bot_notify_move,
                game_end: bot_game_end,
                drop: bot_drop,
            };

            Box::into_raw(Box::new($crate::plugin::BotPlugin { bot_ptr, vtable }))
        }

        unsafe extern "C" fn bot_name(ptr: *mut ()) -> *const c_char {
            let bot = &*(ptr as *const $bot_type);
            let name = bot.name();
            let c_string = CString::new(name).unwrap();
            c_string.into_raw()
        }

        unsafe extern "C" fn bot_choose_move(
            ptr: *mut (),
            state: *const $crate::state::GameState,
            time_limit_ms: u64,
        ) -> *const $crate::plugin::SquarePair {
            let bot = &mut *(ptr as *mut $bot_type);
            let state = &*state;
            let time_limit = std::time::Duration::from_millis(time_limit_ms);

            match bot.choose_squares(state, time_limit) {
                Some((from, to)) => {
                    Box::into_raw(Box::new($crate::plugin::SquarePair { from, to }))
                }
                None => std::ptr::null(),
            }
        }

        unsafe extern "C" fn bot_game_start(ptr: *mut (), team: $crate::piece::TeamType) {
            let bot = &mut *(ptr as *mut $bot_type);
            bot.game_start(team);
        }

        unsafe extern "C" fn bot_notify_move(ptr: *mut (), pair: $crate::plugin::SquarePair) {
            let bot = &mut *(ptr as *mut $bot_type);
            bot.notify_squares(pair.from, pair.to);
        }

        unsafe extern "C" fn bot_game_end(ptr: *mut ()) {
            let bot = &mut *(ptr as *mut $bot_type);
            bot.game_end();
        }

        unsafe extern "C" fn bot_drop(ptr: *mut ()) {
            let _ = Box::from_raw(ptr as *mut $bot_type);
        }
    };
}
