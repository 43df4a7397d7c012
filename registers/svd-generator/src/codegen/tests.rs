// Licensed under the Apache-2.0 license

//! Tests for the model builder, deduplicator and planner.

mod test {
    use super::super::*;
    use crate::config::{PeripheralFilter, Strategy, Style};
    use crate::output::{AccessorKind, Placement};
    use crate::types::{Access, EnumUsage, Field, Register};
    use crate::util::IdentSet;

    const GPIO_SVD: &str = r#"
<device schemaVersion="1.1">
  <name>STM32F4</name>
  <version>1.0</version>
  <resetValue>0x0</resetValue>
  <size>32</size>
  <peripherals>
    <peripheral>
      <name>GPIOA</name>
      <description>General-purpose I/Os</description>
      <groupName>GPIO</groupName>
      <baseAddress>0x40020000</baseAddress>
      <addressBlock>
        <offset>0x0</offset>
        <size>0x400</size>
        <usage>registers</usage>
      </addressBlock>
      <registers>
        <register>
          <name>MODER</name>
          <description>GPIO port mode register</description>
          <addressOffset>0x00</addressOffset>
          <access>read-write</access>
          <resetValue>0xA8000000</resetValue>
          <fields>
            <field>
              <name>MODE</name>
              <bitOffset>5</bitOffset>
              <bitWidth>2</bitWidth>
              <enumeratedValues>
                <name>E_Mode</name>
                <usage>read</usage>
                <enumeratedValue><name>Input</name><value>0</value></enumeratedValue>
                <enumeratedValue><name>Output</name><value>1</value></enumeratedValue>
              </enumeratedValues>
              <enumeratedValues>
                <name>E_Cmd</name>
                <usage>write</usage>
                <enumeratedValue><name>Stop</name><value>0</value></enumeratedValue>
                <enumeratedValue><name>Go</name><value>3</value></enumeratedValue>
              </enumeratedValues>
            </field>
          </fields>
        </register>
        <register>
          <name>CH%s</name>
          <description>Channel control</description>
          <addressOffset>0x10</addressOffset>
          <dim>3</dim>
          <dimIncrement>4</dimIncrement>
          <fields>
            <field>
              <name>EN</name>
              <bitOffset>0</bitOffset>
              <bitWidth>1</bitWidth>
            </field>
          </fields>
        </register>
      </registers>
    </peripheral>
    <peripheral derivedFrom="GPIOA">
      <name>GPIOB</name>
      <baseAddress>0x40020400</baseAddress>
    </peripheral>
  </peripherals>
</device>
"#;

    fn device(xml: &str) -> crate::types::Device {
        build(&Document::parse(xml).unwrap())
    }

    fn reg(name: &str, offset: u64, fields: Vec<Field>) -> Register {
        Register {
            name: name.to_string(),
            address_offset: offset,
            size: 32,
            fields,
            ..Default::default()
        }
    }

    fn field(name: &str, offset: u32, width: u32) -> Field {
        Field {
            name: name.to_string(),
            bit_offset: offset,
            bit_width: width,
            ..Default::default()
        }
    }

    fn wrap(peripherals: &str) -> String {
        format!("<device><name>TEST</name><peripherals>{peripherals}</peripherals></device>")
    }

    #[test]
    fn test_build_device_metadata() {
        let device = device(GPIO_SVD);
        assert_eq!(device.name, "STM32F4");
        assert_eq!(device.version.as_deref(), Some("1.0"));
        assert_eq!(device.schema_version.as_deref(), Some("1.1"));
        assert_eq!(device.peripherals.len(), 2);

        let gpioa = &device.peripherals[0];
        assert_eq!(gpioa.base_address, 0x4002_0000);
        assert_eq!(gpioa.group_name.as_deref(), Some("GPIO"));
        assert_eq!(gpioa.address_block.size, 0x400);
        let moder = &gpioa.registers[0];
        assert_eq!(moder.reset_value, 0xA800_0000);
        assert_eq!(moder.size, 32);
        let mode = &moder.fields[0];
        assert_eq!((mode.bit_offset, mode.bit_width), (5, 2));
        assert_eq!(mode.enums.len(), 2);
        assert_eq!(mode.enums[0].usage, EnumUsage::Read);
        assert_eq!(mode.enums[1].values[1].value, 3);
    }

    #[test]
    fn test_derived_peripheral_is_a_deep_copy() {
        let mut device = device(GPIO_SVD);
        let (gpioa, gpiob) = (&device.peripherals[0], &device.peripherals[1]);
        assert_eq!(gpiob.base_address, 0x4002_0400);
        assert_eq!(gpiob.registers, gpioa.registers);
        assert_eq!(gpiob.description, gpioa.description);
        assert_eq!(gpiob.derived_from.as_deref(), Some("GPIOA"));

        device.peripherals[1].registers[0].name = "CHANGED".into();
        assert_eq!(device.peripherals[0].registers[0].name, "MODER");
    }

    #[test]
    fn test_derived_override_base_address() {
        let device = device(&wrap(
            r#"
<peripheral>
  <name>USART1</name>
  <baseAddress>0x40011000</baseAddress>
  <registers><register><name>SR</name><addressOffset>0</addressOffset></register></registers>
</peripheral>
<peripheral derivedFrom="USART1">
  <name>USART2</name>
  <baseAddress>0x50000000</baseAddress>
</peripheral>"#,
        ));
        assert_eq!(device.peripherals[1].base_address, 0x5000_0000);
        assert_eq!(device.peripherals[1].name, "USART2");
        assert_eq!(device.peripherals[1].registers, device.peripherals[0].registers);
    }

    #[test]
    fn test_unresolved_derivation_is_degraded() {
        let device = device(&wrap(
            r#"
<peripheral derivedFrom="NOPE">
  <name>TIM2</name>
  <baseAddress>0x40000000</baseAddress>
</peripheral>"#,
        ));
        assert_eq!(device.peripherals.len(), 1);
        assert!(device.peripherals[0].registers.is_empty());
        assert_eq!(device.peripherals[0].base_address, 0x4000_0000);
    }

    #[test]
    fn test_attribute_defaults() {
        let device = device(&wrap(
            r#"
<peripheral>
  <name>TIM2</name>
  <size>16</size>
  <registers>
    <register><name>CR1</name><access>sideways</access></register>
    <register><name>SR</name><size>8</size><access>read-only</access></register>
  </registers>
</peripheral>"#,
        ));
        let tim = &device.peripherals[0];
        assert_eq!(tim.base_address, 0);
        assert_eq!(tim.address_block.size, 0);
        let cr1 = &tim.registers[0];
        assert_eq!(cr1.address_offset, 0);
        assert_eq!(cr1.reset_value, 0);
        assert_eq!(cr1.access, Access::ReadWrite);
        assert_eq!(cr1.size, 16);
        let sr = &tim.registers[1];
        assert_eq!(sr.size, 8);
        assert_eq!(sr.access, Access::ReadOnly);
    }

    #[test]
    fn test_field_access_and_bit_ranges() {
        let device = device(&wrap(
            r#"
<peripheral>
  <name>ADC</name>
  <registers>
    <register>
      <name>SR</name>
      <access>read-only</access>
      <fields>
        <field><name>EOC</name><bitOffset>1</bitOffset><bitWidth>1</bitWidth></field>
        <field><name>CLR</name><lsb>4</lsb><msb>7</msb><access>write-only</access></field>
        <field><name>CH</name><bitRange>[15:8]</bitRange></field>
      </fields>
    </register>
  </registers>
</peripheral>"#,
        ));
        let fields = &device.peripherals[0].registers[0].fields;
        assert_eq!(fields[0].access, Access::ReadOnly);
        assert_eq!(fields[1].access, Access::WriteOnly);
        assert_eq!((fields[1].bit_offset, fields[1].bit_width), (4, 4));
        assert_eq!((fields[2].bit_offset, fields[2].bit_width), (8, 8));
    }

    #[test]
    fn test_cluster_build_and_expand() {
        let device = device(&wrap(
            r#"
<peripheral>
  <name>DMA</name>
  <registers>
    <cluster>
      <name>ST%s</name>
      <dim>2</dim>
      <dimIncrement>0x18</dimIncrement>
      <addressOffset>0x10</addressOffset>
      <register><name>CR</name><addressOffset>0x0</addressOffset></register>
      <register><name>NDTR</name><addressOffset>0x4</addressOffset></register>
    </cluster>
  </registers>
</peripheral>"#,
        ));
        assert_eq!(device.peripherals[0].registers.len(), 2);
        let expanded = expand_device(device);
        let got: Vec<_> = expanded.peripherals[0]
            .registers
            .iter()
            .map(|r| (r.name.as_str(), r.address_offset))
            .collect();
        assert_eq!(
            got,
            vec![
                ("ST0_CR", 0x10),
                ("ST0_NDTR", 0x14),
                ("ST1_CR", 0x28),
                ("ST1_NDTR", 0x2c)
            ]
        );
    }

    #[test]
    fn test_canonical_hash_ignores_name_and_offset() {
        let a = reg("A", 0x0, vec![field("EN", 0, 1), field("MODE", 4, 2)]);
        let b = reg("B", 0x40, vec![field("EN", 0, 1), field("MODE", 4, 2)]);
        assert_eq!(
            layout_hash(&canonical_register(&a)),
            layout_hash(&canonical_register(&b))
        );

        let wider = reg("A", 0x0, vec![field("EN", 0, 1), field("MODE", 4, 3)]);
        assert_ne!(
            layout_hash(&canonical_register(&a)),
            layout_hash(&canonical_register(&wider))
        );

        let read_only = Register {
            access: Access::ReadOnly,
            ..a.clone()
        };
        assert_ne!(canonical_register(&a), canonical_register(&read_only));
    }

    #[test]
    fn test_dedup_aggregation() {
        let registers = vec![
            reg("CH0", 0x0, vec![field("EN", 0, 1)]),
            reg("CH1", 0x4, vec![field("EN", 0, 1)]),
            reg("CH2", 0x8, vec![field("EN", 0, 1)]),
        ];
        let layout = PeripheralLayout::analyze(&registers);
        assert_eq!(layout.groups.len(), 1);
        let group = &layout.groups[0];
        assert_eq!(group.representative, 0);
        assert_eq!(group.min_offset, 0x0);
        assert_eq!(group.max_offset, 0x8);
        assert_eq!(group.count, 3);
        assert_eq!(group.stride(), Some(4));
        assert_eq!(layout.group_of, vec![0, 0, 0]);
        assert_eq!(layout.slot_of(2), 2);
    }

    #[test]
    fn test_uneven_spacing_uses_offset_table() {
        let registers = vec![
            reg("IRQ0", 0x0, vec![field("EN", 0, 1)]),
            reg("IRQ1", 0x4, vec![field("EN", 0, 1)]),
            reg("IRQ3", 0xc, vec![field("EN", 0, 1)]),
        ];
        let layout = PeripheralLayout::analyze(&registers);
        assert_eq!(layout.groups[0].stride(), None);

        let peripheral = crate::types::Peripheral {
            name: "NVIC".into(),
            registers,
            ..Default::default()
        };
        let decl = plan_peripheral(&peripheral, &layout, "Nvic".into(), "nvic".into());
        assert_eq!(
            decl.registers[0].placement,
            Placement::Indexed {
                offsets: vec![0x0, 0x4, 0xc],
                stride: None
            }
        );

        let mut fixed = String::new();
        crate::output::render_decl(
            &mut fixed,
            &crate::output::Decl::Peripheral(decl.clone()),
            Style::Fixed,
        );
        assert!(fixed.contains("pub const OFFSETS: [usize; 3] = [0, 4, 0xc];"));
        assert!(fixed.contains("BASE + Self::OFFSETS[INDEX]"));

        let mut runtime = String::new();
        crate::output::render_decl(
            &mut runtime,
            &crate::output::Decl::Peripheral(decl),
            Style::Runtime,
        );
        assert!(runtime.contains("Self::OFFSETS[index]"));
    }

    #[test]
    fn test_distinct_layouts_stay_separate() {
        let registers = vec![
            reg("CR", 0x0, vec![field("EN", 0, 1)]),
            reg("SR", 0x4, vec![field("BUSY", 0, 1)]),
        ];
        let layout = PeripheralLayout::analyze(&registers);
        assert_eq!(layout.groups.len(), 2);
        assert!(layout.groups.iter().all(|g| g.count == 1));
    }

    #[test]
    fn test_enum_registry_reuses_and_qualifies() {
        let state = |values: &[(&str, u64)]| crate::types::Enum {
            name: "E_State".into(),
            usage: EnumUsage::ReadWrite,
            values: values
                .iter()
                .map(|&(name, value)| crate::types::EnumValue {
                    name: name.into(),
                    description: None,
                    value,
                })
                .collect(),
        };
        let f = field("STATE", 0, 2);
        let mut types = IdentSet::new();
        let mut registry = EnumRegistry::new();

        let (first, decl) = registry.resolve(&state(&[("Off", 0)]), &f, "Cr", "u32", &mut types);
        assert_eq!(first, "EState");
        assert!(decl.is_some());

        let (again, decl) = registry.resolve(&state(&[("Off", 0)]), &f, "Sr", "u32", &mut types);
        assert_eq!(again, "EState");
        assert!(decl.is_none());

        let (other, decl) = registry.resolve(&state(&[("On", 1)]), &f, "Sr", "u32", &mut types);
        assert_eq!(other, "SrEState");
        assert_eq!(decl.unwrap().values[0].name, "ON");
    }

    #[test]
    fn test_enum_typing() {
        let code = generate_from_str(GPIO_SVD, &GeneratorConfig::new().strategy(Strategy::Fixed))
            .unwrap();
        assert_eq!(code.matches("pub struct EMode(pub u32);").count(), 1);
        assert_eq!(code.matches("pub struct ECmd(pub u32);").count(), 1);
        assert!(code.contains(
            "pub const fn mode(&self) -> regbase::Field<Self, 5, 2, regbase::ReadWrite, EMode, ECmd> {"
        ));
        assert!(code.contains("pub fn mode(self) -> EMode {"));
        assert!(code.contains("pub fn with_mode(self, value: ECmd) -> Self {"));
        assert!(code.contains("pub const GO: Self = Self(3);"));

        let code = generate_from_str(GPIO_SVD, &GeneratorConfig::new().strategy(Strategy::Runtime))
            .unwrap();
        assert!(code.contains("pub fn mode(&self, value: Option<ECmd>) -> EMode {"));
    }

    #[test]
    fn test_register_groups_get_indexed_accessors() {
        let code = generate_from_str(GPIO_SVD, &GeneratorConfig::new()).unwrap();
        assert!(code.contains("pub struct Ch<const BASE: usize, const INDEX: usize>(pub(super) ());"));
        assert!(code.contains("BASE + 0x10 + 4 * INDEX"));
        assert!(code.contains("pub const fn ch1(&self) -> gpioa::Ch<BASE, 1> {"));
        assert!(code.contains("pub const fn ch_at<const INDEX: usize>(&self) -> gpioa::Ch<BASE, INDEX> {"));
        assert!(code.contains("pub fn ch_at(&self, index: usize) -> gpioa::Ch {"));
        assert!(code.contains("pub fn ch2(&self) -> gpioa::Ch {"));
        assert!(code.contains("unsafe { gpioa::Ch::new(self.base + 0x18) }"));
        // Only one type for the three channels.
        assert_eq!(code.matches("pub struct ChValue(pub u32);").count(), 2);
    }

    #[test]
    fn test_identical_peripherals_collapse() {
        let doc = Document::parse(GPIO_SVD).unwrap();
        let expanded = build_expanded(&doc.root());
        let dedup = DedupMap::analyze(&expanded);
        assert_eq!(dedup.representative(0), 0);
        assert_eq!(dedup.representative(1), 0);
        assert_eq!(dedup.aliases_of(0), vec![1]);
        assert_eq!(dedup.hash(0), dedup.hash(1));
        let device = expanded.clone().into_inner();
        assert_eq!(device.peripheral("GPIOB").unwrap().registers.len(), 4);
        assert!(device.peripheral("GPIOC").is_none());

        let code = generate(&doc, &GeneratorConfig::new());
        assert!(code.contains("pub struct Gpioa<const BASE: usize = 0x4002_0000>(());"));
        assert!(code.contains("pub type Gpiob = Gpioa<0x4002_0400>;"));
        assert!(code.contains("pub type Gpiob = Gpioa;"));
        assert!(!code.contains("pub mod gpiob"));
        assert!(code.contains("pub const GPIOB_BASE: usize = 0x4002_0400;"));
    }

    #[test]
    fn test_strategy_selection() {
        let fixed = generate_from_str(GPIO_SVD, &GeneratorConfig::new().strategy(Strategy::Fixed))
            .unwrap();
        assert!(fixed.contains("pub mod fixed {"));
        assert!(!fixed.contains("pub mod runtime {"));
        assert!(fixed.contains("pub mod regbase {"));
        assert!(fixed.contains("pub mod device {"));

        let runtime = generate_from_str(
            GPIO_SVD,
            &GeneratorConfig::new()
                .strategy(Strategy::Runtime)
                .external_runtime("crate::regbase"),
        )
        .unwrap();
        assert!(!runtime.contains("pub mod fixed {"));
        assert!(runtime.contains("pub mod runtime {"));
        assert!(runtime.contains("pub use crate::regbase as regbase;"));
        assert!(!runtime.contains("pub mod regbase {"));
    }

    #[test]
    fn test_filter_applies_after_derivation() {
        let config = GeneratorConfig::new().filter(PeripheralFilter::new().exclude_name("gpioa"));
        let code = generate_from_str(GPIO_SVD, &config).unwrap();
        assert!(code.contains("pub struct Gpiob<const BASE: usize = 0x4002_0400>(());"));
        assert!(!code.contains("Gpioa"));
        assert!(code.contains("pub fn ch_at(&self, index: usize) -> gpiob::Ch {"));
    }

    #[test]
    fn test_colliding_names_are_disambiguated() {
        let registers = vec![
            reg("Cr1", 0x0, vec![field("EN", 0, 1)]),
            reg("CR1", 0x4, vec![field("BUSY", 1, 1)]),
        ];
        let layout = PeripheralLayout::analyze(&registers);
        let peripheral = crate::types::Peripheral {
            name: "TIM".into(),
            registers,
            ..Default::default()
        };
        let decl = plan_peripheral(&peripheral, &layout, "Tim".into(), "tim".into());
        let names: Vec<_> = decl.accessors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["cr1", "cr1_1"]);
        let types: Vec<_> = decl.registers.iter().map(|r| r.type_name.as_str()).collect();
        assert_eq!(types, vec!["Cr1", "Cr1_1"]);
    }

    #[test]
    fn test_reserved_field_names_are_renamed() {
        let register = reg("CR", 0, vec![field("RESET", 0, 1), field("VALUE", 1, 1)]);
        let decl = plan_register(
            &register,
            "CR",
            Placement::Single { offset: 0 },
            &mut IdentSet::new(),
            &mut EnumRegistry::new(),
        );
        let names: Vec<_> = decl.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["reset1", "value1"]);
    }

    #[test]
    fn test_oversized_field_is_skipped() {
        let register = reg("CR", 0, vec![field("EN", 0, 1), field("HUGE", 30, 4)]);
        let decl = plan_register(
            &register,
            "CR",
            Placement::Single { offset: 0 },
            &mut IdentSet::new(),
            &mut EnumRegistry::new(),
        );
        assert_eq!(decl.fields.len(), 1);
        assert_eq!(decl.fields[0].name, "en");

        // A 24-bit register is stored in a u32 but still ends at bit 24.
        let register = Register {
            size: 24,
            ..reg("CR", 0, vec![field("LOW", 22, 2), field("F", 28, 2), field("G", 23, 2)])
        };
        let decl = plan_register(
            &register,
            "CR",
            Placement::Single { offset: 0 },
            &mut IdentSet::new(),
            &mut EnumRegistry::new(),
        );
        assert_eq!(decl.bits, "u32");
        let names: Vec<_> = decl.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["low"]);
    }

    #[test]
    fn test_out_of_range_bit_position_is_skipped() {
        let register = reg("CR", 0, vec![field("EN", 0, 1), field("END", u32::MAX, 2)]);
        let decl = plan_register(
            &register,
            "CR",
            Placement::Single { offset: 0 },
            &mut IdentSet::new(),
            &mut EnumRegistry::new(),
        );
        assert_eq!(decl.fields.len(), 1);

        let svd = wrap(
            r#"<peripheral><name>P</name><baseAddress>0x1000</baseAddress><registers>
                <register><name>CR</name><addressOffset>0</addressOffset><fields>
                  <field><name>EN</name><bitOffset>0</bitOffset><bitWidth>1</bitWidth></field>
                  <field><name>WRAP</name><bitOffset>0xFFFFFFFF</bitOffset><bitWidth>2</bitWidth></field>
                  <field><name>WIDE</name><bitOffset>0x100000000</bitOffset><bitWidth>1</bitWidth></field>
                  <field><name>SPAN</name><lsb>0</lsb><msb>0xFFFFFFFFFFFFFFFF</msb></field>
                </fields></register>
              </registers></peripheral>"#,
        );
        let fields = &device(&svd).peripherals[0].registers[0].fields;
        // Out-of-range positions become zero-width rather than truncated.
        assert!(fields[1..].iter().all(|f| (f.bit_offset, f.bit_width) == (0, 0)));

        let code = generate_from_str(&svd, &GeneratorConfig::new()).unwrap();
        assert!(code.contains("pub fn en("));
        assert!(!code.contains("pub fn wrap("));
        assert!(!code.contains("pub fn wide("));
        assert!(!code.contains("pub fn span("));
    }

    #[test]
    fn test_oversized_dim_falls_back_to_one_instance() {
        let svd = wrap(
            r#"<peripheral><name>P</name><baseAddress>0x1000</baseAddress><registers>
                <register><name>R%s</name><dim>0xFFFFFFFF</dim><dimIncrement>4</dimIncrement>
                  <addressOffset>0</addressOffset></register>
              </registers></peripheral>"#,
        );
        let device = device(&svd);
        let dim = device.peripherals[0].registers[0].dim.as_ref().unwrap();
        assert_eq!(dim.dim, 1);

        let expanded = expand_device(device).into_inner();
        assert_eq!(expanded.peripherals[0].registers.len(), 1);
        assert_eq!(expanded.peripherals[0].registers[0].name, "R");
    }

    #[test]
    fn test_field_groups() {
        let register = Register {
            name: "MODER".into(),
            size: 32,
            fields: vec![crate::types::Field {
                name: "MODER%s".into(),
                bit_width: 2,
                dim: Some(crate::types::DimElement {
                    dim: 4,
                    dim_increment: 2,
                    dim_index: vec![],
                }),
                ..Default::default()
            }],
            ..Default::default()
        };
        let expanded = expand_register("GPIOA", &register);
        let decl = plan_register(
            &expanded[0],
            "MODER",
            Placement::Single { offset: 0 },
            &mut IdentSet::new(),
            &mut EnumRegistry::new(),
        );
        assert_eq!(decl.fields.len(), 4);
        assert_eq!(decl.field_groups.len(), 1);
        let group = &decl.field_groups[0];
        assert_eq!(group.at_name, "moder_at");
        assert_eq!(group.fields_name, "moder_fields");
        assert_eq!(group.offsets, vec![0, 2, 4, 6]);

        let code = crate::output::render(&[crate::output::Decl::Register(decl)]);
        assert!(code.contains("pub fn moder_at(self, index: usize) -> u32 {"));
        assert!(code.contains("pub fn with_moder_at(self, index: usize, value: u32) -> Self {"));
        assert!(code.contains("const OFFSETS: [u32; 4] = [0, 2, 4, 6];"));
        assert!(code.contains("pub const fn moder_fields(&self) -> ("));
    }

    #[test]
    fn test_accessor_kinds() {
        let doc = Document::parse(GPIO_SVD).unwrap();
        let expanded = build_expanded(&doc.root());
        let dedup = DedupMap::analyze(&expanded);
        let decl = plan_peripheral(
            &expanded.peripherals[0],
            dedup.layout(0),
            "Gpioa".into(),
            "gpioa".into(),
        );
        let kinds: Vec<_> = decl.accessors.iter().map(|a| a.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                AccessorKind::Single { offset: 0 },
                AccessorKind::Instance { index: 0, offset: 0x10 },
                AccessorKind::Instance { index: 1, offset: 0x14 },
                AccessorKind::Instance { index: 2, offset: 0x18 },
                AccessorKind::Indexed { count: 3 },
            ]
        );
    }

    #[test]
    fn test_storage_type() {
        assert_eq!(storage_type(8), ("u8", 8));
        assert_eq!(storage_type(16), ("u16", 16));
        assert_eq!(storage_type(24), ("u32", 32));
        assert_eq!(storage_type(64), ("u64", 64));
        assert_eq!(DEFAULT_REGISTER_SIZE, 32);
    }

    #[test]
    fn test_malformed_documents() {
        assert!(generate_from_str("<device><name>", &GeneratorConfig::new()).is_err());
        assert!(generate_from_str("<notadevice/>", &GeneratorConfig::new()).is_err());
    }
}
