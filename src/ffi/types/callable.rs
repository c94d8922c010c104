//! Function signature metadata: return type, parameters and calling convention.

use smallvec::SmallVec;

use super::arena::TypeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallingConvention {
    /// Whatever the platform's C compiler uses.
    Default,
    Cdecl,
    Fastcall,
    Thiscall,
    Stdcall,
    Pascal,
    Register,
    Ms,
    Sysv,
    Vectorcall,
}

impl CallingConvention {
    /// The convention `Default` is reported as: `cdecl` on Windows, `fastcall` elsewhere.
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            CallingConvention::Cdecl
        } else {
            CallingConvention::Fastcall
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            CallingConvention::Default => Self::platform_default().tag(),
            CallingConvention::Cdecl => "cdecl",
            CallingConvention::Fastcall => "fastcall",
            CallingConvention::Thiscall => "thiscall",
            CallingConvention::Stdcall => "stdcall",
            CallingConvention::Pascal => "pascal",
            CallingConvention::Register => "register",
            CallingConvention::Ms => "ms",
            CallingConvention::Sysv => "sysv",
            CallingConvention::Vectorcall => "vectorcall",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallableType {
    pub returns: TypeId,
    pub params: SmallVec<[TypeId; 4]>,
    pub abi: CallingConvention,
    pub variadic: bool,
}

impl CallableType {
    pub fn new(returns: TypeId) -> Self {
        Self {
            returns,
            params: SmallVec::new(),
            abi: CallingConvention::Default,
            variadic: false,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Callable invariants required by the signature renderer.
    use super::*;

    #[test]
    fn constructor_initializes_empty_parameter_list() {
        let callable = CallableType::new(TypeId::from_index(0));
        assert!(callable.params.is_empty(), "callable starts without parameters");
        assert_eq!(callable.abi, CallingConvention::Default);
        assert!(!callable.variadic);
    }

    #[test]
    fn default_convention_resolves_to_platform_tag() {
        let expected = if cfg!(windows) { "cdecl" } else { "fastcall" };
        assert_eq!(CallingConvention::Default.tag(), expected);
        assert_eq!(CallingConvention::Sysv.tag(), "sysv", "explicit conventions keep their tag");
    }
}
