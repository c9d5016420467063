//! Per-instruction translation state: operand resolution, addressing-mode
//! computation, and the small emit helpers the translators and the flag
//! engine are built from.

use armlift_arch::{
    ArchInfo, ArmMemoryOperand, ArmOperand, ArmRegisterListOperand, ArmShiftedOperand,
    Displacement, IndexMode, ShiftAmount, ShiftKind,
};
use armlift_ir::{IrImmediate, IrInstruction, IrMnemonic, IrOperand, IrRegister};

use crate::error::Unsupported;
use crate::namer::TempNamer;
use crate::symbolic::{resolve, Entry, Label};

/// Accumulates the symbolic IR sequence for one native instruction.
///
/// Created fresh per instruction, consumed by [`TranslationBuilder::finish`].
/// Dropping it without finishing discards everything it emitted, which is
/// how the dispatcher throws away partial output on an unsupported
/// instruction.
pub(crate) struct TranslationBuilder<'a> {
    temps: &'a mut TempNamer,
    arch: ArchInfo,
    entries: Vec<Entry>,
}

impl<'a> TranslationBuilder<'a> {
    pub(crate) fn new(temps: &'a mut TempNamer, arch: ArchInfo) -> Self {
        TranslationBuilder {
            temps,
            arch,
            entries: Vec::new(),
        }
    }

    pub(crate) fn emit(&mut self, instr: IrInstruction) {
        self.entries.push(Entry::Instr(instr));
    }

    /// A fresh temporary register of the given width.
    pub(crate) fn temporal(&mut self, size: u8) -> IrOperand {
        IrOperand::Reg(IrRegister::new(self.temps.next_name(), size))
    }

    pub(crate) fn label(&self, name: &str) -> Label {
        Label(name.to_owned())
    }

    /// Place a label at the current end of the sequence.
    pub(crate) fn place(&mut self, label: Label) {
        self.entries.push(Entry::Mark(label));
    }

    /// Jump to `target` when `cond` is non-zero.
    pub(crate) fn jump_if(&mut self, cond: IrOperand, target: &Label) {
        self.entries.push(Entry::Jump {
            cond,
            target: target.clone(),
        });
    }

    /// Unconditional jump to `target`.
    pub(crate) fn jump(&mut self, target: &Label) {
        self.jump_if(IrOperand::imm(1, 1), target);
    }

    pub(crate) fn jump_if_zero(&mut self, value: &IrOperand, target: &Label) {
        let is_zero = self.temporal(1);
        self.emit(IrInstruction::bisz(value.clone(), is_zero.clone()));
        self.jump_if(is_zero, target);
    }

    /// Resolve labels and assign addresses; consumes the builder.
    pub(crate) fn finish(self, native_address: u64) -> Vec<IrInstruction> {
        resolve(self.entries, native_address, self.arch.address_size() + 8)
    }

    /// Word size in bytes, as an operand-width immediate.
    pub(crate) fn word_size(&self) -> IrOperand {
        IrOperand::imm(u128::from(self.arch.word_size()), self.arch.operand_size())
    }

    pub(crate) fn word_bytes(&self) -> u64 {
        self.arch.word_size()
    }

    pub(crate) fn program_counter(&self) -> IrOperand {
        IrOperand::reg("pc", self.arch.operand_size())
    }

    pub(crate) fn link_register(&self) -> IrOperand {
        IrOperand::reg("lr", self.arch.operand_size())
    }

    // --- operand resolution -------------------------------------------------

    /// Resolve an operand to an IR value, emitting whatever address
    /// arithmetic, shifts, or loads that takes.
    ///
    /// Register lists have no single value; they go through
    /// [`TranslationBuilder::register_list`].
    pub(crate) fn read(&mut self, operand: &ArmOperand) -> Result<IrOperand, Unsupported> {
        match operand {
            ArmOperand::Imm(imm) => Ok(IrOperand::Imm(IrImmediate::signed(
                i128::from(imm.value),
                imm.size,
            ))),
            ArmOperand::Reg(reg) => Ok(IrOperand::reg(reg.name.clone(), reg.size)),
            ArmOperand::Shifted(sh) => self.shifter_value(sh),
            ArmOperand::Mem(mem) => {
                let addr = self.memory_address(mem)?;
                let value = self.temporal(mem.size);
                self.emit(IrInstruction::ldm(addr, value.clone()));
                Ok(value)
            }
            ArmOperand::RegList(_) => Err(Unsupported::Operand("register list")),
        }
    }

    /// Store `value` into a register or memory destination.
    ///
    /// A register store truncates to the destination register's own width;
    /// double-width arithmetic results rely on this.
    pub(crate) fn write(
        &mut self,
        operand: &ArmOperand,
        value: IrOperand,
    ) -> Result<(), Unsupported> {
        match operand {
            ArmOperand::Reg(reg) => {
                self.emit(IrInstruction::str(
                    value,
                    IrOperand::reg(reg.name.clone(), reg.size),
                ));
                Ok(())
            }
            ArmOperand::Mem(mem) => {
                let addr = self.memory_address(mem)?;
                self.emit(IrInstruction::stm(value, addr));
                Ok(())
            }
            _ => Err(Unsupported::Operand("destination")),
        }
    }

    /// Value of a shifter operand. Without an amount this is the base
    /// register itself and nothing is emitted.
    fn shifter_value(&mut self, sh: &ArmShiftedOperand) -> Result<IrOperand, Unsupported> {
        let base = IrOperand::reg(sh.base.name.clone(), sh.size);
        let Some(amount) = &sh.amount else {
            return Ok(base);
        };
        let amount = match amount {
            ShiftAmount::Imm(imm) => IrOperand::Imm(IrImmediate::signed(
                i128::from(imm.value),
                sh.size,
            )),
            ShiftAmount::Reg(reg) => IrOperand::reg(reg.name.clone(), reg.size),
        };
        if sh.kind != ShiftKind::Lsl {
            return Err(Unsupported::ShiftKind(sh.kind));
        }
        let shifted = self.temporal(sh.size);
        self.emit(IrInstruction::bsh(base, amount, shifted.clone()));
        Ok(shifted)
    }

    /// Effective address of a memory operand, with the indexing mode's
    /// write-back side effects.
    ///
    /// Pre-indexing updates the base register with the computed address
    /// before returning it; post-indexing returns the unmodified base and
    /// then updates the base register.
    fn memory_address(&mut self, mem: &ArmMemoryOperand) -> Result<IrOperand, Unsupported> {
        let base = IrOperand::reg(mem.base.name.clone(), mem.size);
        let Some(displacement) = &mem.displacement else {
            return Ok(base);
        };
        let displacement = match displacement {
            Displacement::Reg(reg) => IrOperand::reg(reg.name.clone(), mem.size),
            Displacement::Imm(imm) => {
                IrOperand::Imm(IrImmediate::signed(i128::from(imm.value), mem.size))
            }
            Displacement::Shifted(sh) => self.shifter_value(sh)?,
        };

        let combine = if mem.minus {
            IrInstruction::sub
        } else {
            IrInstruction::add
        };

        match mem.index_mode {
            IndexMode::Pre => {
                let addr = self.temporal(mem.size);
                self.emit(combine(base.clone(), displacement, addr.clone()));
                self.emit(IrInstruction::str(addr.clone(), base));
                Ok(addr)
            }
            IndexMode::Offset => {
                let addr = self.temporal(mem.size);
                self.emit(combine(base, displacement, addr.clone()));
                Ok(addr)
            }
            IndexMode::Post => {
                let addr = self.temporal(base.size());
                self.emit(IrInstruction::str(base.clone(), addr.clone()));
                let updated = self.temporal(base.size());
                self.emit(combine(base.clone(), displacement, updated.clone()));
                self.emit(IrInstruction::str(updated, base));
                Ok(addr)
            }
        }
    }

    /// Expand a register list into the ordered registers it names.
    ///
    /// Ranges expand by the numeric suffix, endpoints inclusive. An inverted
    /// range is a decoder bug and panics.
    pub(crate) fn register_list(&self, list: &ArmRegisterListOperand) -> Vec<IrRegister> {
        let mut registers = Vec::new();
        for range in &list.ranges {
            let Some(last) = &range.last else {
                registers.push(IrRegister::new(range.first.name.clone(), range.first.size));
                continue;
            };
            let (prefix, lo) = split_register_name(&range.first.name);
            let (_, hi) = split_register_name(&last.name);
            assert!(
                lo <= hi,
                "inverted register range {}-{}",
                range.first.name,
                last.name
            );
            for index in lo..=hi {
                registers.push(IrRegister::new(format!("{prefix}{index}"), range.first.size));
            }
        }
        registers
    }

    // --- emit helpers -------------------------------------------------------

    fn binary(&mut self, mnemonic: IrMnemonic, a: &IrOperand, b: &IrOperand) -> IrOperand {
        let out = self.temporal(a.size());
        self.emit(IrInstruction::new(
            mnemonic,
            [a.clone(), b.clone(), out.clone()],
        ));
        out
    }

    pub(crate) fn add(&mut self, a: &IrOperand, b: &IrOperand) -> IrOperand {
        self.binary(IrMnemonic::Add, a, b)
    }

    pub(crate) fn sub(&mut self, a: &IrOperand, b: &IrOperand) -> IrOperand {
        self.binary(IrMnemonic::Sub, a, b)
    }

    pub(crate) fn and(&mut self, a: &IrOperand, b: &IrOperand) -> IrOperand {
        self.binary(IrMnemonic::And, a, b)
    }

    pub(crate) fn or(&mut self, a: &IrOperand, b: &IrOperand) -> IrOperand {
        self.binary(IrMnemonic::Or, a, b)
    }

    pub(crate) fn xor(&mut self, a: &IrOperand, b: &IrOperand) -> IrOperand {
        self.binary(IrMnemonic::Xor, a, b)
    }

    /// Bitwise complement via `xor` with an all-ones mask.
    pub(crate) fn not(&mut self, value: &IrOperand) -> IrOperand {
        let mask = IrOperand::Imm(IrImmediate::all_ones(value.size()));
        self.binary(IrMnemonic::Xor, value, &mask)
    }

    /// 1-bit equality: all bits equal.
    pub(crate) fn equal(&mut self, a: &IrOperand, b: &IrOperand) -> IrOperand {
        let difference = self.xor(a, b);
        self.not(&difference)
    }

    pub(crate) fn unequal(&mut self, a: &IrOperand, b: &IrOperand) -> IrOperand {
        self.xor(a, b)
    }

    /// Extract a statically known bit into a 1-bit value.
    pub(crate) fn extract_bit(&mut self, value: &IrOperand, bit: u8) -> IrOperand {
        assert!(
            bit < value.size(),
            "bit {bit} out of range for a {}-bit value",
            value.size()
        );
        let shifted = self.temporal(value.size());
        self.emit(IrInstruction::bsh(
            value.clone(),
            IrOperand::Imm(IrImmediate::signed(-i128::from(bit), value.size())),
            shifted.clone(),
        ));
        let out = self.temporal(1);
        self.emit(IrInstruction::and(
            shifted,
            IrOperand::imm(1, value.size()),
            out.clone(),
        ));
        out
    }

    /// Extract a bit whose index is only known at run time. The index is
    /// assumed in range.
    pub(crate) fn extract_bit_runtime(
        &mut self,
        value: &IrOperand,
        bit: &IrOperand,
    ) -> IrOperand {
        let shifted = self.temporal(value.size());
        let negated_bit = self.temporal(value.size());
        let out = self.temporal(1);
        self.emit(IrInstruction::sub(
            IrOperand::imm(0, bit.size()),
            bit.clone(),
            negated_bit.clone(),
        ));
        self.emit(IrInstruction::bsh(value.clone(), negated_bit, shifted.clone()));
        self.emit(IrInstruction::and(
            shifted,
            IrOperand::imm(1, value.size()),
            out.clone(),
        ));
        out
    }

    /// Signed `a >= b` as a 1-bit value: sign of the difference equals the
    /// subtraction overflow.
    pub(crate) fn greater_or_equal(&mut self, a: &IrOperand, b: &IrOperand) -> IrOperand {
        assert_eq!(a.size(), b.size(), "operand width mismatch");
        let result = self.temporal(a.size() * 2);
        self.emit(IrInstruction::sub(a.clone(), b.clone(), result.clone()));
        let sign = self.extract_bit(&result, a.size() - 1);
        let overflow = self.overflow_from_sub(a, b, &result);
        self.equal(&sign, &overflow)
    }

    /// Signed overflow of `a - b`: operand signs differ and the result sign
    /// differs from `a`'s.
    pub(crate) fn overflow_from_sub(
        &mut self,
        a: &IrOperand,
        b: &IrOperand,
        result: &IrOperand,
    ) -> IrOperand {
        let sign_a = self.extract_bit(a, a.size() - 1);
        let sign_b = self.extract_bit(b, a.size() - 1);
        let sign_result = self.extract_bit(result, a.size() - 1);
        let signs_differ = self.unequal(&sign_a, &sign_b);
        let result_differs = self.unequal(&sign_a, &sign_result);
        self.and(&signs_differ, &result_differs)
    }
}

fn split_register_name(name: &str) -> (&str, u32) {
    let index: u32 = name[1..]
        .parse()
        .unwrap_or_else(|_| panic!("register `{name}` has no numeric suffix"));
    (&name[..1], index)
}
