// Licensed under the Apache-2.0 license

//! Volatile register access primitives used by generated peripheral accessors.
//!
//! Generated code builds on three pieces:
//!
//! - register value types implementing [`RegisterValue`]: immutable, in-memory
//!   copies of a register. Field mutators return a new value, so any number of
//!   fields can be changed before a single store.
//! - fixed-address registers implementing [`FixedRegister`], whose address is
//!   an associated constant, and their [`Field`] accessors.
//! - runtime-address registers ([`DynRegister`]) and fields ([`DynField`]),
//!   whose address is computed from a peripheral base at call time.
//!
//! Accesses are unsynchronized volatile loads and stores. Callers that share a
//! register with an interrupt handler or another core must provide their own
//! exclusion around read-modify-write sequences.

use core::marker::PhantomData;

/// Integer types a register can be stored in.
pub trait RegisterBits: Copy + Eq + core::fmt::Debug {
    const BITS: u32;
    fn to_u64(self) -> u64;
    fn from_u64(bits: u64) -> Self;
}

macro_rules! impl_register_bits {
    ($($ty:ty),*) => {
        $(
            impl RegisterBits for $ty {
                const BITS: u32 = <$ty>::BITS;

                #[inline(always)]
                fn to_u64(self) -> u64 {
                    self as u64
                }

                #[inline(always)]
                fn from_u64(bits: u64) -> Self {
                    bits as $ty
                }
            }
        )*
    };
}

impl_register_bits!(u8, u16, u32, u64);

/// A value that can be stored in a bit field of a `T` register.
///
/// Implemented for the raw storage type and for generated enumerations.
pub trait FieldValue<T: RegisterBits>: Copy {
    fn into_bits(self) -> T;
    fn from_bits(bits: T) -> Self;
}

impl<T: RegisterBits> FieldValue<T> for T {
    #[inline(always)]
    fn into_bits(self) -> T {
        self
    }

    #[inline(always)]
    fn from_bits(bits: T) -> Self {
        bits
    }
}

/// Access permissions of a register or field.
pub trait Access {
    const READABLE: bool;
    const WRITABLE: bool;
}

/// Marker for access modes that permit reads.
pub trait Readable: Access {}

/// Marker for access modes that permit writes.
pub trait Writable: Access {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadOnly;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteOnly;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadWrite;

impl Access for ReadOnly {
    const READABLE: bool = true;
    const WRITABLE: bool = false;
}

impl Access for WriteOnly {
    const READABLE: bool = false;
    const WRITABLE: bool = true;
}

impl Access for ReadWrite {
    const READABLE: bool = true;
    const WRITABLE: bool = true;
}

impl Readable for ReadOnly {}
impl Readable for ReadWrite {}
impl Writable for WriteOnly {}
impl Writable for ReadWrite {}

/// Mask with the low `width` bits set.
#[inline(always)]
pub const fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Extract the `width`-bit field at `offset` from `bits`.
#[inline(always)]
pub fn extract<T: RegisterBits>(bits: T, offset: u32, width: u32) -> T {
    T::from_u64((bits.to_u64() >> offset) & mask(width))
}

/// Replace the `width`-bit field at `offset` in `bits` with `value`.
///
/// Bits of `value` above `width` are discarded; bits outside the field are
/// preserved.
#[inline(always)]
pub fn insert<T: RegisterBits>(bits: T, offset: u32, width: u32, value: T) -> T {
    let field = mask(width) << offset;
    T::from_u64((bits.to_u64() & !field) | ((value.to_u64() << offset) & field))
}

/// Volatile read of a register.
///
/// # Safety
///
/// `address` must be valid and aligned for a volatile read of `T`.
#[inline(always)]
pub unsafe fn read<T: RegisterBits>(address: usize) -> T {
    core::ptr::read_volatile(address as *const T)
}

/// Volatile write of a register.
///
/// # Safety
///
/// `address` must be valid and aligned for a volatile write of `T`.
#[inline(always)]
pub unsafe fn write<T: RegisterBits>(address: usize, value: T) {
    core::ptr::write_volatile(address as *mut T, value)
}

/// An immutable, in-memory copy of one register.
pub trait RegisterValue: Copy {
    type Bits: RegisterBits;

    /// Value of the register after reset.
    const RESET: Self::Bits;

    fn from_bits(bits: Self::Bits) -> Self;

    fn bits(self) -> Self::Bits;

    /// The reset value wrapped as a register value.
    #[inline(always)]
    fn reset_value() -> Self {
        Self::from_bits(Self::RESET)
    }
}

/// Bits of the starting point for a field update: the current register
/// contents when the register can be read, its reset value otherwise.
#[inline(always)]
unsafe fn update_base<V: RegisterValue, A: Access>(address: usize) -> V::Bits {
    if A::READABLE {
        read(address)
    } else {
        V::RESET
    }
}

/// A register whose absolute address is known at compile time.
///
/// # Safety
///
/// `ADDRESS` must be the address of a memory-mapped register of type
/// `Value::Bits`, and values of the implementing type may only exist while it
/// is sound to access that register.
pub unsafe trait FixedRegister: Sized {
    type Value: RegisterValue;
    type Access: Access;

    const ADDRESS: usize;

    #[inline(always)]
    fn address(&self) -> usize {
        Self::ADDRESS
    }

    /// Read the register once and wrap the result for field extraction or
    /// further chaining.
    #[inline(always)]
    fn load(&self) -> Self::Value
    where
        Self::Access: Readable,
    {
        // SAFETY: guaranteed by the implementor of `FixedRegister`.
        Self::Value::from_bits(unsafe { read(Self::ADDRESS) })
    }

    /// Write an accumulated value with a single store.
    #[inline(always)]
    fn store(&self, value: Self::Value)
    where
        Self::Access: Writable,
    {
        // SAFETY: guaranteed by the implementor of `FixedRegister`.
        unsafe { write(Self::ADDRESS, value.bits()) }
    }

    /// One load, an in-memory update, one store.
    #[inline(always)]
    fn modify<F>(&self, f: F)
    where
        Self::Access: Readable + Writable,
        F: FnOnce(Self::Value) -> Self::Value,
    {
        self.store(f(self.load()))
    }

    /// Write the reset value.
    #[inline(always)]
    fn reset(&self)
    where
        Self::Access: Writable,
    {
        self.store(Self::Value::reset_value())
    }
}

/// Storage type of a fixed register.
pub type BitsOf<R> = <<R as FixedRegister>::Value as RegisterValue>::Bits;

/// A bit field of a fixed-address register.
///
/// `RT` is the type returned by reads and `WT` the type accepted by writes;
/// both are the raw storage type unless the field declares enumerations.
pub struct Field<R, const OFFSET: u32, const WIDTH: u32, A, RT, WT> {
    _marker: PhantomData<(R, A, RT, WT)>,
}

impl<R, const OFFSET: u32, const WIDTH: u32, A, RT, WT> Field<R, OFFSET, WIDTH, A, RT, WT>
where
    R: FixedRegister,
    A: Access,
    RT: FieldValue<BitsOf<R>>,
    WT: FieldValue<BitsOf<R>>,
{
    pub const OFFSET: u32 = OFFSET;
    pub const WIDTH: u32 = WIDTH;

    /// # Safety
    ///
    /// Same contract as [`FixedRegister`] for `R`.
    #[inline(always)]
    pub const unsafe fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    pub fn address(&self) -> usize {
        R::ADDRESS
    }

    /// Read the register and extract this field.
    #[inline(always)]
    pub fn get(&self) -> RT
    where
        A: Readable,
    {
        // SAFETY: the field only exists for a valid `R`.
        let bits: BitsOf<R> = unsafe { read(R::ADDRESS) };
        RT::from_bits(extract(bits, OFFSET, WIDTH))
    }

    /// Update only this field's bits in the register.
    #[inline(always)]
    pub fn set(&self, value: WT)
    where
        A: Writable,
    {
        // SAFETY: the field only exists for a valid `R`.
        unsafe {
            let base = update_base::<R::Value, R::Access>(R::ADDRESS);
            write(R::ADDRESS, insert(base, OFFSET, WIDTH, value.into_bits()));
        }
    }

    /// Compute the register value with this field replaced, without touching
    /// hardware.
    #[inline(always)]
    pub fn eval_set(&self, current: R::Value, value: WT) -> R::Value {
        R::Value::from_bits(insert(current.bits(), OFFSET, WIDTH, value.into_bits()))
    }

    /// Extract this field from a previously loaded value.
    #[inline(always)]
    pub fn eval_get(&self, current: R::Value) -> RT {
        RT::from_bits(extract(current.bits(), OFFSET, WIDTH))
    }
}

/// A register whose address is computed at run time.
pub struct DynRegister<V, A> {
    address: usize,
    _marker: PhantomData<(V, A)>,
}

impl<V, A> Clone for DynRegister<V, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V, A> Copy for DynRegister<V, A> {}

impl<V, A> core::fmt::Debug for DynRegister<V, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "DynRegister({:#x})", self.address)
    }
}

impl<V: RegisterValue, A: Access> DynRegister<V, A> {
    /// # Safety
    ///
    /// `address` must be valid and aligned for volatile accesses of
    /// `V::Bits` for as long as the handle is used.
    #[inline(always)]
    pub const unsafe fn new(address: usize) -> Self {
        Self {
            address,
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    pub const fn address(&self) -> usize {
        self.address
    }

    #[inline(always)]
    pub fn load(&self) -> V
    where
        A: Readable,
    {
        // SAFETY: guaranteed by `new`.
        V::from_bits(unsafe { read(self.address) })
    }

    #[inline(always)]
    pub fn store(&self, value: V)
    where
        A: Writable,
    {
        // SAFETY: guaranteed by `new`.
        unsafe { write(self.address, value.bits()) }
    }

    #[inline(always)]
    pub fn modify<F>(&self, f: F)
    where
        A: Readable + Writable,
        F: FnOnce(V) -> V,
    {
        self.store(f(self.load()))
    }

    #[inline(always)]
    pub fn reset(&self)
    where
        A: Writable,
    {
        self.store(V::reset_value())
    }

    /// Store `value` when given, then read the register back.
    #[inline(always)]
    pub fn value(&self, value: Option<V>) -> V
    where
        A: Readable + Writable,
    {
        if let Some(value) = value {
            self.store(value);
        }
        self.load()
    }

    /// A field of this register.
    #[inline(always)]
    pub fn field<FA, RT, WT>(&self, offset: u32, width: u32) -> DynField<V, FA, RT, WT>
    where
        FA: Access,
        RT: FieldValue<V::Bits>,
        WT: FieldValue<V::Bits>,
    {
        DynField {
            address: self.address,
            offset,
            width,
            register_readable: A::READABLE,
            _marker: PhantomData,
        }
    }
}

/// A bit field of a runtime-address register.
pub struct DynField<V, A, RT, WT> {
    address: usize,
    offset: u32,
    width: u32,
    register_readable: bool,
    _marker: PhantomData<(V, A, RT, WT)>,
}

impl<V, A, RT, WT> DynField<V, A, RT, WT>
where
    V: RegisterValue,
    A: Access,
    RT: FieldValue<V::Bits>,
    WT: FieldValue<V::Bits>,
{
    #[inline(always)]
    pub const fn address(&self) -> usize {
        self.address
    }

    #[inline(always)]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    #[inline(always)]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[inline(always)]
    pub fn get(&self) -> RT
    where
        A: Readable,
    {
        // SAFETY: the field was created from a valid `DynRegister`.
        let bits: V::Bits = unsafe { read(self.address) };
        RT::from_bits(extract(bits, self.offset, self.width))
    }

    #[inline(always)]
    pub fn set(&self, value: WT)
    where
        A: Writable,
    {
        // SAFETY: the field was created from a valid `DynRegister`.
        unsafe {
            let base = if self.register_readable {
                read(self.address)
            } else {
                V::RESET
            };
            write(
                self.address,
                insert(base, self.offset, self.width, value.into_bits()),
            );
        }
    }

    /// Write `value` when given, then read the field back.
    #[inline(always)]
    pub fn value(&self, value: Option<WT>) -> RT
    where
        A: Readable + Writable,
    {
        if let Some(value) = value {
            self.set(value);
        }
        self.get()
    }
}
