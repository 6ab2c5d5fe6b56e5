use std::ops::Range;

pub const FORMAT_VERSION_OFFSET: usize = 0;
pub const LENGTH_OFFSET: usize = 1;
pub const FORMAT_VERSION_MASK: u8 = 0x0F;

pub const CHASSIS_TYPE_OFFSET: usize = 2;
pub const CHASSIS_FIELDS_OFFSET: usize = 3;

pub const BOARD_LANGUAGE_OFFSET: usize = 2;
pub const BOARD_MFG_DATE_TIME_RANGE: Range<usize> = 3..6;
pub const BOARD_FIELDS_OFFSET: usize = 6;

pub const PRODUCT_LANGUAGE_OFFSET: usize = 2;
pub const PRODUCT_FIELDS_OFFSET: usize = 3;

/// Largest length byte value, in 8-byte blocks.
pub const MAX_AREA_LEN: usize = u8::MAX as usize * crate::header::layout::BLOCK_SIZE;
/// Manufacture date/time is stored in three bytes.
pub const MAX_MFG_DATE_TIME: u32 = 0x00FF_FFFF;

pub const CHASSIS_FIELD_NAMES: [&str; 2] = ["part_number", "serial_number"];
pub const BOARD_FIELD_NAMES: [&str; 5] = [
    "manufacturer",
    "product_name",
    "serial_number",
    "part_number",
    "fru_file_id",
];
pub const PRODUCT_FIELD_NAMES: [&str; 7] = [
    "manufacturer",
    "product_name",
    "part_number",
    "product_version",
    "serial_number",
    "asset_tag",
    "fru_file_id",
];
pub const CUSTOM_FIELD_NAME: &str = "custom_fields";

// SMBIOS chassis types, starting at 0x01.
const CHASSIS_TYPE_NAMES: [&str; 36] = [
    "Other",
    "Unknown",
    "Desktop",
    "Low Profile Desktop",
    "Pizza Box",
    "Mini Tower",
    "Tower",
    "Portable",
    "Laptop",
    "Notebook",
    "Hand Held",
    "Docking Station",
    "All in One",
    "Sub Notebook",
    "Space-saving",
    "Lunch Box",
    "Main Server Chassis",
    "Expansion Chassis",
    "SubChassis",
    "Bus Expansion Chassis",
    "Peripheral Chassis",
    "RAID Chassis",
    "Rack Mount Chassis",
    "Sealed-case PC",
    "Multi-system Chassis",
    "Compact PCI",
    "Advanced TCA",
    "Blade",
    "Blade Enclosure",
    "Tablet",
    "Convertible",
    "Detachable",
    "IoT Gateway",
    "Embedded PC",
    "Mini PC",
    "Stick PC",
];

/// Human-readable SMBIOS chassis type, if the code is known.
pub fn chassis_type_name(code: u8) -> Option<&'static str> {
    (code as usize)
        .checked_sub(1)
        .and_then(|index| CHASSIS_TYPE_NAMES.get(index))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::chassis_type_name;

    #[test]
    fn chassis_type_names() {
        assert_eq!(chassis_type_name(0x17), Some("Rack Mount Chassis"));
        assert_eq!(chassis_type_name(0x24), Some("Stick PC"));
        assert_eq!(chassis_type_name(0x00), None);
        assert_eq!(chassis_type_name(0x25), None);
    }
}
