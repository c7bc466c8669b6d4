//! Bridge backed by the native capture module (Windows only)
//!
//! The module is a DLL exporting a flat C ABI. It is loaded once with
//! `LoadLibraryW` and every export is resolved up front, so a missing symbol is
//! reported at load time instead of on first use.

use super::{BridgeError, BridgeResult, CaptureBridge};
use crate::core::types::{
    Address, AffixSlot, EquipmentAttributes, EquipmentKind, FieldMask, ProcessId,
};
use std::ffi::{c_char, CStr, OsStr};
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use windows::core::{PCSTR, PCWSTR};
use windows::Win32::Foundation::HMODULE;
use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};

type AttachProcessFn = unsafe extern "C" fn(u32) -> bool;
type VoidFn = unsafe extern "C" fn();
type BoolFn = unsafe extern "C" fn() -> bool;
type IntFn = unsafe extern "C" fn() -> i32;
type QwordFn = unsafe extern "C" fn() -> u64;
type ReadAffixExFn =
    unsafe extern "C" fn(i32, *mut i32, *mut i32, *mut u8, *mut u8, *mut u8, *mut u8) -> bool;
type WriteAffixExMaskedFn = unsafe extern "C" fn(i32, i32, i32, u8, u8, u8, u8, u32) -> bool;
type ReadEquipmentBasicsExFn = unsafe extern "C" fn(
    *mut i16,
    *mut i16,
    *mut i16,
    *mut u8,
    *mut i32,
    *mut i32,
    *mut i32,
    *mut bool,
) -> bool;
type WriteEquipmentBasicsExFn = unsafe extern "C" fn(i16, i16, i16, u8, i32, i32, i32, bool) -> bool;
type LastErrorFn = unsafe extern "C" fn() -> *const c_char;

/// Resolved export table
struct NativeApi {
    attach_process: AttachProcessFn,
    detach_process: VoidFn,
    is_attached: BoolFn,
    enable_capture: BoolFn,
    disable_capture: VoidFn,
    is_capture_enabled: BoolFn,
    get_equipment_base: QwordFn,
    read_affix_ex: ReadAffixExFn,
    write_affix_ex_masked: WriteAffixExMaskedFn,
    read_equipment_basics_ex: ReadEquipmentBasicsExFn,
    write_equipment_basics_ex: WriteEquipmentBasicsExFn,
    get_last_error_message: LastErrorFn,
    // Newer exports; older module builds lack them.
    get_current_equipment_type: Option<IntFn>,
    enable_skill_bypass: Option<BoolFn>,
    disable_skill_bypass: Option<BoolFn>,
    is_skill_bypass_enabled: Option<BoolFn>,
}

/// Looks up an export by its NUL-terminated name
///
/// # Safety
/// `module` must be a loaded module and `T` must be the export's exact fn pointer type.
unsafe fn lookup<T: Copy>(module: HMODULE, name: &'static [u8]) -> Option<T> {
    debug_assert_eq!(name.last(), Some(&0));
    GetProcAddress(module, PCSTR::from_raw(name.as_ptr()))
        .map(|proc| std::mem::transmute_copy::<_, T>(&proc))
}

/// Like [`lookup`], but a missing export is an error
///
/// # Safety
/// Same contract as [`lookup`].
unsafe fn require<T: Copy>(module: HMODULE, name: &'static [u8]) -> BridgeResult<T> {
    lookup(module, name).ok_or_else(|| {
        let printable = String::from_utf8_lossy(&name[..name.len().saturating_sub(1)]);
        BridgeError::Failed(format!("native module is missing export {}", printable))
    })
}

/// Capture bridge over the native DLL
pub struct NativeBridge {
    api: NativeApi,
    // The module keeps global state; calls are serialized.
    call_lock: Mutex<()>,
}

// SAFETY: the export table holds plain fn pointers into a module that stays
// loaded for the life of the process, and every call goes through `call_lock`.
unsafe impl Send for NativeBridge {}
unsafe impl Sync for NativeBridge {}

impl NativeBridge {
    /// Loads the module from `path` and resolves its exports
    pub fn load(path: &Path) -> BridgeResult<Self> {
        let wide: Vec<u16> = OsStr::new(path)
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        // SAFETY: `wide` is NUL-terminated and outlives the call.
        let module = unsafe { LoadLibraryW(PCWSTR::from_raw(wide.as_ptr())) }.map_err(|e| {
            BridgeError::Failed(format!(
                "failed to load native module {}: {}",
                path.display(),
                e
            ))
        })?;

        // SAFETY: `module` was just loaded and the signatures mirror the module's exports.
        let api = unsafe {
            NativeApi {
                attach_process: require(module, b"AttachProcess\0")?,
                detach_process: require(module, b"DetachProcess\0")?,
                is_attached: require(module, b"IsAttached\0")?,
                enable_capture: require(module, b"EnableCapture\0")?,
                disable_capture: require(module, b"DisableCapture\0")?,
                is_capture_enabled: require(module, b"IsCaptureEnabled\0")?,
                get_equipment_base: require(module, b"GetEquipmentBase\0")?,
                read_affix_ex: require(module, b"ReadAffixEx\0")?,
                write_affix_ex_masked: require(module, b"WriteAffixExMasked\0")?,
                read_equipment_basics_ex: require(module, b"ReadEquipmentBasicsEx\0")?,
                write_equipment_basics_ex: require(module, b"WriteEquipmentBasicsEx\0")?,
                get_last_error_message: require(module, b"GetLastErrorMessage\0")?,
                get_current_equipment_type: lookup(module, b"GetCurrentEquipmentType\0"),
                enable_skill_bypass: lookup(module, b"EnableSkillBypass\0"),
                disable_skill_bypass: lookup(module, b"DisableSkillBypass\0"),
                is_skill_bypass_enabled: lookup(module, b"IsSkillBypassEnabled\0"),
            }
        };

        info!("Loaded native capture module from {}", path.display());
        Ok(NativeBridge {
            api,
            call_lock: Mutex::new(()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.call_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Text of the module's most recent failure
    pub fn last_error_text(&self) -> String {
        // SAFETY: the export returns either null or a NUL-terminated string it owns.
        let text = unsafe {
            let ptr = (self.api.get_last_error_message)();
            if ptr.is_null() {
                String::new()
            } else {
                CStr::from_ptr(ptr).to_string_lossy().into_owned()
            }
        };

        if text.trim().is_empty() {
            "unknown native error".to_string()
        } else {
            text
        }
    }

    /// Maps a native success flag to a result, pulling the error text on failure
    fn check(&self, ok: bool) -> BridgeResult<()> {
        if ok {
            Ok(())
        } else {
            Err(BridgeError::Failed(self.last_error_text()))
        }
    }
}

impl CaptureBridge for NativeBridge {
    fn name(&self) -> &str {
        "NativeEngine"
    }

    fn attach_process(&self, pid: ProcessId) -> BridgeResult<()> {
        let _guard = self.lock();
        // SAFETY: resolved export with matching signature.
        let ok = unsafe { (self.api.attach_process)(pid) };
        self.check(ok)
    }

    fn detach_process(&self) -> BridgeResult<()> {
        let _guard = self.lock();
        // SAFETY: resolved export with matching signature.
        unsafe { (self.api.detach_process)() };
        Ok(())
    }

    fn is_attached(&self) -> bool {
        let _guard = self.lock();
        // SAFETY: resolved export with matching signature.
        unsafe { (self.api.is_attached)() }
    }

    fn enable_capture(&self) -> BridgeResult<()> {
        let _guard = self.lock();
        // SAFETY: resolved export with matching signature.
        let ok = unsafe { (self.api.enable_capture)() };
        self.check(ok)
    }

    fn disable_capture(&self) -> BridgeResult<()> {
        let _guard = self.lock();
        // SAFETY: resolved export with matching signature.
        unsafe { (self.api.disable_capture)() };
        Ok(())
    }

    fn is_capture_enabled(&self) -> bool {
        let _guard = self.lock();
        // SAFETY: resolved export with matching signature.
        unsafe { (self.api.is_capture_enabled)() }
    }

    fn equipment_base_address(&self) -> Option<Address> {
        let _guard = self.lock();
        // SAFETY: resolved export with matching signature.
        Address::from_raw(unsafe { (self.api.get_equipment_base)() })
    }

    fn read_affix_slot(&self, index: u8) -> BridgeResult<AffixSlot> {
        let _guard = self.lock();
        let (mut id, mut level) = (0i32, 0i32);
        let mut prefixes = [0u8; 4];
        let [p1, p2, p3, p4] = &mut prefixes;

        // SAFETY: all out-pointers reference live locals.
        let ok = unsafe {
            (self.api.read_affix_ex)(
                index as i32 - 1,
                &mut id,
                &mut level,
                p1,
                p2,
                p3,
                p4,
            )
        };
        self.check(ok)?;
        Ok(AffixSlot::new(index, id, level, prefixes))
    }

    fn write_affix_slot_masked(&self, slot: &AffixSlot, mask: FieldMask) -> BridgeResult<()> {
        let _guard = self.lock();
        let [p1, p2, p3, p4] = slot.prefixes;
        debug!(slot = slot.index, mask = %mask, "native masked write");

        // SAFETY: resolved export with matching signature; arguments are plain values.
        let ok = unsafe {
            (self.api.write_affix_ex_masked)(
                slot.position() as i32,
                slot.id,
                slot.level,
                p1,
                p2,
                p3,
                p4,
                mask.bits(),
            )
        };
        self.check(ok)
    }

    fn read_equipment_attributes(&self) -> BridgeResult<EquipmentAttributes> {
        let _guard = self.lock();
        let mut out = EquipmentAttributes::default();

        // SAFETY: all out-pointers reference fields of a live local.
        let ok = unsafe {
            (self.api.read_equipment_basics_ex)(
                &mut out.item_id,
                &mut out.transmog_id,
                &mut out.level,
                &mut out.plus_value,
                &mut out.quality,
                &mut out.underworld_skill_id,
                &mut out.familiarity,
                &mut out.is_underworld,
            )
        };
        self.check(ok)?;
        Ok(out)
    }

    fn write_equipment_attributes(&self, data: &EquipmentAttributes) -> BridgeResult<()> {
        let _guard = self.lock();
        // SAFETY: resolved export with matching signature; arguments are plain values.
        let ok = unsafe {
            (self.api.write_equipment_basics_ex)(
                data.item_id,
                data.transmog_id,
                data.level,
                data.plus_value,
                data.quality,
                data.underworld_skill_id,
                data.familiarity,
                data.is_underworld,
            )
        };
        self.check(ok)
    }

    fn equipment_kind(&self) -> EquipmentKind {
        let _guard = self.lock();
        match self.api.get_current_equipment_type {
            // SAFETY: resolved export with matching signature.
            Some(f) => EquipmentKind::from(unsafe { f() }),
            None => EquipmentKind::Unknown,
        }
    }

    fn set_skill_bypass(&self, enabled: bool) -> BridgeResult<()> {
        let _guard = self.lock();
        let export = if enabled {
            self.api.enable_skill_bypass
        } else {
            self.api.disable_skill_bypass
        };
        let f = export.ok_or(BridgeError::Unimplemented)?;
        // SAFETY: resolved export with matching signature.
        let ok = unsafe { f() };
        self.check(ok)
    }

    fn is_skill_bypass_enabled(&self) -> bool {
        let _guard = self.lock();
        match self.api.is_skill_bypass_enabled {
            // SAFETY: resolved export with matching signature.
            Some(f) => unsafe { f() },
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_load_missing_module() {
        let result = NativeBridge::load(Path::new("definitely-not-here-affix.dll"));
        match result {
            Err(BridgeError::Failed(msg)) => assert!(msg.contains("failed to load")),
            _ => panic!("Expected load failure"),
        }
    }
}
